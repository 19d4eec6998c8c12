use crate::error::{AppResult, ValidationError};

/// 每種票種的最大張數
pub const MAX_TICKET_NUM: u8 = 10;

/// 票種枚舉
///
/// 單一字母為官網表單中票數欄位的後綴（如 "1F" 表示一張成人票）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TicketType {
    /// 成人
    Adult,
    /// 孩童
    Child,
    /// 愛心
    Disabled,
    /// 敬老
    Elder,
    /// 大學生
    College,
    /// 少年
    Youth,
}

/// 全部票種，依官網表單列順序排列
pub const ALL_TICKET_TYPES: [TicketType; 6] = [
    TicketType::Adult,
    TicketType::Child,
    TicketType::Disabled,
    TicketType::Elder,
    TicketType::College,
    TicketType::Youth,
];

impl TicketType {
    /// 取得票種的單一字母標記
    pub fn tag(self) -> char {
        match self {
            TicketType::Adult => 'F',
            TicketType::Child => 'H',
            TicketType::Disabled => 'W',
            TicketType::Elder => 'E',
            TicketType::College => 'P',
            TicketType::Youth => 'T',
        }
    }

    /// 取得中文顯示名稱
    pub fn name(self) -> &'static str {
        match self {
            TicketType::Adult => "成人",
            TicketType::Child => "孩童",
            TicketType::Disabled => "愛心",
            TicketType::Elder => "敬老",
            TicketType::College => "大學生",
            TicketType::Youth => "少年",
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 格式化票數為表單字串
///
/// 呼叫端須保證 count 在 0~MAX_TICKET_NUM 之間。
pub fn format_ticket_count(count: u8, ticket_type: TicketType) -> String {
    debug_assert!(count <= MAX_TICKET_NUM);
    format!("{}{}", count, ticket_type.tag())
}

/// 各票種張數
///
/// 對應設定檔的 [tickets] 區段；未填的票種為 0，成人預設 1。
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TicketCounts {
    #[serde(default = "default_adult_num")]
    pub adult: u8,
    #[serde(default)]
    pub child: u8,
    #[serde(default)]
    pub disabled: u8,
    #[serde(default)]
    pub elder: u8,
    #[serde(default)]
    pub college: u8,
    #[serde(default)]
    pub youth: u8,
}

fn default_adult_num() -> u8 {
    1
}

impl Default for TicketCounts {
    fn default() -> Self {
        Self {
            adult: 1,
            child: 0,
            disabled: 0,
            elder: 0,
            college: 0,
            youth: 0,
        }
    }
}

impl TicketCounts {
    /// 取得指定票種的張數
    pub fn count(&self, ticket_type: TicketType) -> u8 {
        match ticket_type {
            TicketType::Adult => self.adult,
            TicketType::Child => self.child,
            TicketType::Disabled => self.disabled,
            TicketType::Elder => self.elder,
            TicketType::College => self.college,
            TicketType::Youth => self.youth,
        }
    }

    /// 設定指定票種的張數
    pub fn set_count(&mut self, ticket_type: TicketType, count: u8) {
        match ticket_type {
            TicketType::Adult => self.adult = count,
            TicketType::Child => self.child = count,
            TicketType::Disabled => self.disabled = count,
            TicketType::Elder => self.elder = count,
            TicketType::College => self.college = count,
            TicketType::Youth => self.youth = count,
        }
    }

    /// 取得指定票種的表單字串（如 "1F"）
    pub fn formatted(&self, ticket_type: TicketType) -> String {
        format_ticket_count(self.count(ticket_type), ticket_type)
    }

    /// 驗證每種票數都在允許範圍內
    pub fn validate(&self) -> AppResult<()> {
        for ticket_type in ALL_TICKET_TYPES {
            let count = self.count(ticket_type);
            if count > MAX_TICKET_NUM {
                return Err(ValidationError::InvalidTicketNum {
                    input: format!("{} {}", ticket_type.name(), count),
                    max: MAX_TICKET_NUM,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_adult_and_child() {
        assert_eq!(format_ticket_count(2, TicketType::Adult), "2F");
        assert_eq!(format_ticket_count(0, TicketType::Child), "0H");
    }

    #[test]
    fn tags_are_distinct() {
        let mut tags: Vec<char> = ALL_TICKET_TYPES.iter().map(|t| t.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ALL_TICKET_TYPES.len());
    }

    #[test]
    fn default_counts_one_adult() {
        let counts = TicketCounts::default();
        assert_eq!(counts.formatted(TicketType::Adult), "1F");
        assert_eq!(counts.formatted(TicketType::Elder), "0E");
        assert!(counts.validate().is_ok());
    }

    #[test]
    fn over_limit_count_rejected() {
        let mut counts = TicketCounts::default();
        counts.set_count(TicketType::Youth, 11);
        assert!(counts.validate().is_err());
    }
}
