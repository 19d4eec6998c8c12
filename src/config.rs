//! 程式設定
//!
//! 分兩層：執行期參數（環境變數覆寫，含重試次數與步驟間隔）
//! 與使用者設定檔（config.toml，提供訂票資料與互動模式的預設值）。

use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{
    ensure_distinct_stations, parse_outbound_date, BookingRequest, Station, TicketCounts, TimeSlot,
};

/// 執行期設定
#[derive(Clone, Debug)]
pub struct Config {
    /// 驗證碼自動識別的最大重試次數
    pub max_captcha_retry: usize,
    /// 驗證碼重試間隔（秒）
    pub captcha_retry_secs: u64,
    /// 每個步驟之間的延遲（毫秒），純粹作為禮貌性節流
    pub step_delay_ms: u64,
    /// 使用者設定檔路徑
    pub profile_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_captcha_retry: 3,
            captcha_retry_secs: 1,
            step_delay_ms: 200,
            profile_path: "config.toml".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_captcha_retry: std::env::var("THSR_MAX_CAPTCHA_RETRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_captcha_retry),
            captcha_retry_secs: std::env::var("THSR_CAPTCHA_RETRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.captcha_retry_secs),
            step_delay_ms: std::env::var("THSR_STEP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.step_delay_ms),
            profile_path: std::env::var("THSR_PROFILE_PATH").unwrap_or(default.profile_path),
        }
    }
}

/// 使用者設定檔（config.toml）
///
/// 自動模式要求必要欄位齊全；互動模式把已填的欄位當作預設值，
/// 缺的再逐項詢問。本結構只讀不寫。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub start_station: Option<String>,
    pub dest_station: Option<String>,
    pub outbound_date: Option<String>,
    pub outbound_time: Option<String>,
    pub personal_id: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tickets: TicketCounts,
    /// 優惠票乘客的預填身分證字號（依乘客順序，優先於互動輸入）
    #[serde(default)]
    pub passenger_ids: Vec<String>,
    /// 驗證碼識別指令（圖片從 stdin 餵入，結果讀 stdout）
    pub ocr_command: Option<String>,
}

/// 讀取使用者設定檔；檔案不存在時回傳 None
pub fn load_profile(path: &str) -> AppResult<Option<Profile>> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let profile: Profile =
        toml::from_str(&content).map_err(|e| AppError::config_parse_failed(path, e))?;
    Ok(Some(profile))
}

impl Profile {
    /// 解析為完整訂票資料（自動模式）
    ///
    /// 分層取值順序為：設定檔 → 無（缺必要欄位直接報錯），
    /// 所有欄位在此一次性驗證完畢，後續流程不再碰原始字串。
    pub fn to_booking_request(&self, today: chrono::NaiveDate) -> AppResult<BookingRequest> {
        let start_station = Station::resolve(self.require("start_station", &self.start_station)?)?;
        let dest_station = Station::resolve(self.require("dest_station", &self.dest_station)?)?;
        ensure_distinct_stations(start_station, dest_station)?;

        let outbound_date =
            parse_outbound_date(self.require("outbound_date", &self.outbound_date)?, today)?;
        let outbound_time =
            TimeSlot::from_hhmm(self.require("outbound_time", &self.outbound_time)?)?;

        self.tickets.validate()?;

        let personal_id = self.require("personal_id", &self.personal_id)?.to_string();

        Ok(BookingRequest {
            start_station,
            dest_station,
            outbound_date,
            outbound_time,
            tickets: self.tickets.clone(),
            personal_id,
            phone: self.phone.clone(),
            email: self.email.clone(),
            passenger_ids: self.passenger_ids.clone(),
        })
    }

    fn require<'a>(&self, field: &str, value: &'a Option<String>) -> AppResult<&'a str> {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingField {
                    field: field.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketType;

    fn today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn full_profile() -> Profile {
        toml::from_str(
            r#"
            start_station = "台北"
            dest_station = "左營"
            outbound_date = "2026-08-20"
            outbound_time = "10:00"
            personal_id = "A123456789"
            phone = "0912345678"

            [tickets]
            adult = 1
            elder = 2
            "#,
        )
        .unwrap()
    }

    #[test]
    fn full_profile_resolves() {
        let request = full_profile().to_booking_request(today()).unwrap();
        assert_eq!(request.start_station, Station::Taipei);
        assert_eq!(request.dest_station, Station::Zuoying);
        assert_eq!(request.outbound_date, "2026/08/20");
        assert_eq!(request.outbound_time.wire(), "1000A");
        assert_eq!(request.tickets.formatted(TicketType::Adult), "1F");
        assert_eq!(request.tickets.formatted(TicketType::Elder), "2E");
        assert_eq!(request.personal_id, "A123456789");
    }

    #[test]
    fn missing_required_field_is_config_error() {
        let mut profile = full_profile();
        profile.personal_id = None;
        let err = profile.to_booking_request(today()).unwrap_err();
        assert!(err.to_string().contains("personal_id"));
    }

    #[test]
    fn same_station_rejected() {
        let mut profile = full_profile();
        profile.dest_station = Some("台北".to_string());
        assert!(profile.to_booking_request(today()).is_err());
    }

    #[test]
    fn env_knobs_have_defaults() {
        let config = Config::default();
        assert_eq!(config.max_captcha_retry, 3);
        assert_eq!(config.captcha_retry_secs, 1);
        assert_eq!(config.step_delay_ms, 200);
    }
}
