//! 乘客身分證檢核 - 業務能力層
//!
//! 重複身分證屬於提示性檢查：產生警告後交由使用者確認，
//! 不會默默放行，也不會在未詢問的情況下直接中止。

use crate::error::{AppResult, ValidationError};

/// 一位乘客的身分證填寫項
///
/// 於乘客資訊頁收集，最終送出時一次性使用。
#[derive(Debug, Clone)]
pub struct PassengerIdEntry {
    /// 表單欄位名稱
    pub field_name: String,
    /// 乘客序號
    pub ordinal: usize,
    /// 票種標籤（如「敬老」、「愛心」）
    pub fare_label: String,
    /// 身分證字號
    pub id_value: String,
}

/// 重複身分證檢查結果
#[derive(Debug, Default)]
pub struct DuplicateReport {
    /// 一般重複警告
    pub warnings: Vec<String>,
    /// 違反優惠票規則的警告
    pub violations: Vec<String>,
}

impl DuplicateReport {
    /// 是否發現任何重複（需要使用者確認才能繼續）
    pub fn has_duplicates(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 驗證身分證字號格式
///
/// 規則刻意從簡：非空且恰為 10 個字元（不驗證檢查碼）。
pub fn validate_personal_id(id: &str) -> AppResult<()> {
    if id.is_empty() {
        return Err(ValidationError::InvalidPersonalId {
            reason: "不可為空".to_string(),
        }
        .into());
    }
    let len = id.chars().count();
    if len != 10 {
        return Err(ValidationError::InvalidPersonalId {
            reason: format!("長度必須為 10 個字元，目前為 {}", len),
        }
        .into());
    }
    Ok(())
}

/// 檢查乘客之間的重複身分證
///
/// 同一字號由多位乘客共用即產生一般警告；
/// 若該字號同時用於敬老票與愛心票、或由兩位以上敬老票乘客共用，
/// 另外產生規則違反警告。
pub fn check_duplicate_ids(entries: &[PassengerIdEntry]) -> DuplicateReport {
    let mut report = DuplicateReport::default();

    // 依首次出現順序分組，警告順序才可預期
    let mut groups: Vec<(&str, Vec<&PassengerIdEntry>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(id, _)| *id == entry.id_value) {
            Some((_, members)) => members.push(entry),
            None => groups.push((entry.id_value.as_str(), vec![entry])),
        }
    }

    for (id, members) in &groups {
        if members.len() < 2 {
            continue;
        }

        report.warnings.push(format!(
            "身分證字號 {} 由 {} 位乘客共用（乘客 {}）",
            id,
            members.len(),
            members
                .iter()
                .map(|m| format!("{}:{}", m.ordinal, m.fare_label))
                .collect::<Vec<_>>()
                .join("、")
        ));

        let elder_count = members.iter().filter(|m| is_elder(&m.fare_label)).count();
        let disabled_count = members.iter().filter(|m| is_disabled(&m.fare_label)).count();

        if elder_count > 0 && disabled_count > 0 {
            report.violations.push(format!(
                "身分證字號 {} 同時用於敬老票與愛心票乘客，不符優惠票規則",
                id
            ));
        }
        if elder_count >= 2 {
            report.violations.push(format!(
                "身分證字號 {} 由 {} 位敬老票乘客共用，不符優惠票規則",
                id, elder_count
            ));
        }
    }

    report
}

fn is_elder(fare_label: &str) -> bool {
    fare_label.contains("敬老")
}

fn is_disabled(fare_label: &str) -> bool {
    fare_label.contains("愛心")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ordinal: usize, fare_label: &str, id_value: &str) -> PassengerIdEntry {
        PassengerIdEntry {
            field_name: format!(
                "TicketPassengerInfoInputPanel:passengerDataView:{}:passengerDataView2:passengerDataIdNumber",
                ordinal
            ),
            ordinal,
            fare_label: fare_label.to_string(),
            id_value: id_value.to_string(),
        }
    }

    #[test]
    fn personal_id_must_be_ten_chars() {
        assert!(validate_personal_id("A123456789").is_ok());
        assert!(validate_personal_id("").is_err());
        assert!(validate_personal_id("A12345678").is_err());
        assert!(validate_personal_id("A1234567890").is_err());
    }

    #[test]
    fn two_elders_sharing_id_is_violation() {
        let entries = vec![entry(1, "敬老", "A123456789"), entry(2, "敬老", "A123456789")];
        let report = check_duplicate_ids(&entries);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].contains("敬老票乘客共用"));
    }

    #[test]
    fn elder_and_disabled_sharing_id_is_violation() {
        let entries = vec![entry(1, "敬老", "A123456789"), entry(2, "愛心", "A123456789")];
        let report = check_duplicate_ids(&entries);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].contains("敬老票與愛心票"));
    }

    #[test]
    fn unrelated_fares_sharing_id_is_warning_only() {
        let entries = vec![entry(1, "成人", "A123456789"), entry(2, "大學生", "A123456789")];
        let report = check_duplicate_ids(&entries);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn distinct_ids_produce_no_warnings() {
        let entries = vec![entry(1, "敬老", "A123456789"), entry(2, "敬老", "B987654321")];
        let report = check_duplicate_ids(&entries);
        assert!(!report.has_duplicates());
        assert!(report.violations.is_empty());
    }
}
