use crate::error::{AppResult, ValidationError};

/// 官網可選的出發時段（依時刻表順序）
///
/// 格式為「時 + 兩位數分 + 時段後綴」：A 為上午、N 為正午、P 為下午。
/// 注意小時不補零（"600A" 而非 "0600A"），此為官網表單的既有格式。
pub const AVAILABLE_TIME_TABLE: [&str; 38] = [
    "1201A", "1230A", "600A", "630A", "700A", "730A", "800A", "830A", "900A", "930A", "1000A",
    "1030A", "1100A", "1130A", "1200N", "1230P", "100P", "130P", "200P", "230P", "300P", "330P",
    "400P", "430P", "500P", "530P", "600P", "630P", "700P", "730P", "800P", "830P", "900P", "930P",
    "1000P", "1030P", "1100P", "1130P",
];

/// 出發時段
///
/// 不變量：內部字串必為 AVAILABLE_TIME_TABLE 的成員，
/// 因此建構成功即代表該時段可在官網表單中送出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot(&'static str);

impl TimeSlot {
    /// 解析 24 小時制時間字串（"HH:MM"）
    ///
    /// 轉換規則：0 時 → "12{mm}A"；1~11 時 → "{h}{mm}A"；
    /// 12:00 → "1200N"；12:mm → "12{mm}P"；13~23 時 → "{h-12}{mm}P"。
    /// 轉換結果必須存在於時刻表中，否則回傳錯誤並列出全部可選時間。
    pub fn from_hhmm(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 2 {
            return Err(ValidationError::InvalidTimeFormat {
                input: trimmed.to_string(),
            }
            .into());
        }

        let (hour, minute) = match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
            (Ok(h), Ok(m)) => (h, m),
            _ => {
                return Err(ValidationError::InvalidTimeFormat {
                    input: trimmed.to_string(),
                }
                .into())
            }
        };

        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTimeFormat {
                input: trimmed.to_string(),
            }
            .into());
        }

        let wire = if hour == 0 {
            format!("12{:02}A", minute)
        } else if hour < 12 {
            format!("{}{:02}A", hour, minute)
        } else if hour == 12 && minute == 0 {
            "1200N".to_string()
        } else if hour == 12 {
            format!("12{:02}P", minute)
        } else {
            format!("{}{:02}P", hour - 12, minute)
        };

        match AVAILABLE_TIME_TABLE.iter().find(|&&t| t == wire) {
            Some(&slot) => Ok(TimeSlot(slot)),
            None => Err(ValidationError::TimeNotAvailable {
                input: trimmed.to_string(),
                available: list_available_hhmm().join(", "),
            }
            .into()),
        }
    }

    /// 依時刻表序號取得時段（1-based，供互動選單使用）
    pub fn from_index(one_based: usize) -> Option<Self> {
        if one_based == 0 {
            return None;
        }
        AVAILABLE_TIME_TABLE.get(one_based - 1).map(|&s| TimeSlot(s))
    }

    /// 取得表單送出用的字串
    pub fn wire(&self) -> &'static str {
        self.0
    }

    /// 轉回 24 小時制顯示（from_hhmm 的精確反函式）
    pub fn to_hhmm(&self) -> String {
        wire_to_hhmm(self.0)
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hhmm())
    }
}

/// 將系統時段字串轉為 24 小時制
///
/// 後綴 A：12 時視為 0 時；N：12 時；P：未滿 12 時加 12。
fn wire_to_hhmm(wire: &str) -> String {
    let suffix = &wire[wire.len() - 1..];
    let digits = &wire[..wire.len() - 1];

    let (hour_part, minute_part) = if digits.len() == 3 {
        (&digits[..1], &digits[1..])
    } else {
        (&digits[..2], &digits[2..])
    };

    let mut hour: u32 = hour_part.parse().unwrap_or(0);
    let minute: u32 = minute_part.parse().unwrap_or(0);

    match suffix {
        "A" => {
            if hour == 12 {
                hour = 0;
            }
        }
        "N" => hour = 12,
        _ => {
            if hour != 12 {
                hour += 12;
            }
        }
    }

    format!("{:02}:{:02}", hour, minute)
}

/// 列出全部可選時段的 24 小時制表示（依時刻表順序）
pub fn list_available_hhmm() -> Vec<String> {
    AVAILABLE_TIME_TABLE.iter().map(|t| wire_to_hhmm(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_table_entry() {
        for &wire in AVAILABLE_TIME_TABLE.iter() {
            let hhmm = wire_to_hhmm(wire);
            let slot = TimeSlot::from_hhmm(&hhmm).unwrap();
            assert_eq!(slot.wire(), wire, "{} 往返失敗", hhmm);
            assert_eq!(slot.to_hhmm(), hhmm);
        }
    }

    #[test]
    fn single_digit_hour_is_not_zero_padded() {
        assert_eq!(TimeSlot::from_hhmm("06:00").unwrap().wire(), "600A");
        assert_eq!(TimeSlot::from_hhmm("18:30").unwrap().wire(), "630P");
    }

    #[test]
    fn midnight_and_noon() {
        assert_eq!(TimeSlot::from_hhmm("00:01").unwrap().wire(), "1201A");
        assert_eq!(TimeSlot::from_hhmm("00:30").unwrap().wire(), "1230A");
        assert_eq!(TimeSlot::from_hhmm("12:00").unwrap().wire(), "1200N");
        assert_eq!(TimeSlot::from_hhmm("12:30").unwrap().wire(), "1230P");
    }

    #[test]
    fn malformed_input_rejected() {
        assert!(TimeSlot::from_hhmm("0600").is_err());
        assert!(TimeSlot::from_hhmm("6:0:0").is_err());
        assert!(TimeSlot::from_hhmm("ab:cd").is_err());
        assert!(TimeSlot::from_hhmm("24:00").is_err());
        assert!(TimeSlot::from_hhmm("12:60").is_err());
    }

    #[test]
    fn unavailable_time_lists_all_slots() {
        let err = TimeSlot::from_hhmm("06:15").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("06:15"));
        assert!(msg.contains("06:00"));
        assert!(msg.contains("23:30"));
    }

    #[test]
    fn from_index_is_one_based() {
        assert_eq!(TimeSlot::from_index(1).unwrap().wire(), "1201A");
        assert_eq!(TimeSlot::from_index(38).unwrap().wire(), "1130P");
        assert!(TimeSlot::from_index(0).is_none());
        assert!(TimeSlot::from_index(39).is_none());
    }
}
