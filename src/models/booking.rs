use chrono::NaiveDate;

use crate::error::{AppResult, ValidationError};
use crate::models::forms::BookingForm;
use crate::models::station::Station;
use crate::models::ticket::{TicketCounts, TicketType};
use crate::models::time::TimeSlot;

/// 開放訂票的天數範圍（今日起算）
pub const DAYS_BEFORE_BOOKING_AVAILABLE: i64 = 28;

/// 一次訂票的完整使用者資料
///
/// 不含驗證碼與頁面動態欄位：那些每次產生頁面都會改變，
/// 於送出前才與本結構合併成完整表單。
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub start_station: Station,
    pub dest_station: Station,
    /// 表單格式的出發日期（"YYYY/MM/DD"）
    pub outbound_date: String,
    pub outbound_time: TimeSlot,
    pub tickets: TicketCounts,
    pub personal_id: String,
    pub phone: String,
    pub email: String,
    /// 優惠票乘客的預填身分證字號（依乘客順序）
    pub passenger_ids: Vec<String>,
}

impl BookingRequest {
    /// 合併頁面動態欄位與驗證碼，產生第一頁表單
    pub fn to_booking_form(
        &self,
        seat_prefer: impl Into<String>,
        types_of_trip: impl Into<String>,
        search_by: impl Into<String>,
        security_code: impl Into<String>,
    ) -> BookingForm {
        BookingForm {
            start_station: self.start_station.code(),
            dest_station: self.dest_station.code(),
            search_by: search_by.into(),
            types_of_trip: types_of_trip.into(),
            seat_prefer: seat_prefer.into(),
            outbound_date: self.outbound_date.clone(),
            outbound_time: self.outbound_time.wire().to_string(),
            to_train_id: String::new(),
            class_type: 0,
            adult_ticket_num: self.tickets.formatted(TicketType::Adult),
            child_ticket_num: self.tickets.formatted(TicketType::Child),
            disabled_ticket_num: self.tickets.formatted(TicketType::Disabled),
            elder_ticket_num: self.tickets.formatted(TicketType::Elder),
            college_ticket_num: self.tickets.formatted(TicketType::College),
            youth_ticket_num: self.tickets.formatted(TicketType::Youth),
            security_code: security_code.into(),
            form_mark: String::new(),
        }
    }
}

/// 驗證出發日期並轉為表單格式
///
/// 接受 "YYYY-MM-DD" 或 "YYYY/MM/DD"，日期須落在今日起
/// DAYS_BEFORE_BOOKING_AVAILABLE 天的可訂票範圍內。
pub fn parse_outbound_date(input: &str, today: NaiveDate) -> AppResult<String> {
    let trimmed = input.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .map_err(|_| ValidationError::InvalidDate {
            input: trimmed.to_string(),
            reason: "請使用 YYYY-MM-DD 格式".to_string(),
        })?;

    let last_available = today + chrono::Duration::days(DAYS_BEFORE_BOOKING_AVAILABLE);
    if parsed < today {
        return Err(ValidationError::InvalidDate {
            input: trimmed.to_string(),
            reason: "不可早於今日".to_string(),
        }
        .into());
    }
    if parsed > last_available {
        return Err(ValidationError::InvalidDate {
            input: trimmed.to_string(),
            reason: format!("最晚可訂 {}", last_available.format("%Y-%m-%d")),
        }
        .into());
    }

    Ok(parsed.format("%Y/%m/%d").to_string())
}

/// 檢查出發站與到達站不可相同
pub fn ensure_distinct_stations(start: Station, dest: Station) -> AppResult<()> {
    if start == dest {
        return Err(ValidationError::StationConflict {
            station: start.name().to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn date_inside_horizon_is_normalized() {
        assert_eq!(parse_outbound_date("2026-08-20", today()).unwrap(), "2026/08/20");
        assert_eq!(parse_outbound_date("2026/08/07", today()).unwrap(), "2026/08/07");
    }

    #[test]
    fn date_outside_horizon_rejected() {
        assert!(parse_outbound_date("2026-08-06", today()).is_err());
        assert!(parse_outbound_date("2026-09-05", today()).is_err());
        assert!(parse_outbound_date("08/20", today()).is_err());
    }

    #[test]
    fn same_station_rejected() {
        assert!(ensure_distinct_stations(Station::Taipei, Station::Taipei).is_err());
        assert!(ensure_distinct_stations(Station::Taipei, Station::Zuoying).is_ok());
    }
}
