use crate::error::{AppResult, ValidationError};

/// 車站中文名稱對照表（顯示名稱 → 車站代碼）
static STATION_NAME_MAP: phf::Map<&'static str, u8> = phf::phf_map! {
    "南港" => 1,
    "台北" => 2,
    "板橋" => 3,
    "桃園" => 4,
    "新竹" => 5,
    "苗栗" => 6,
    "台中" => 7,
    "彰化" => 8,
    "雲林" => 9,
    "嘉義" => 10,
    "台南" => 11,
    "左營" => 12,
};

/// 車站枚舉
///
/// 代碼即官網送出表單時使用的數值（1~12）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Station {
    /// 南港
    Nangang = 1,
    /// 台北
    Taipei = 2,
    /// 板橋
    Banqiao = 3,
    /// 桃園
    Taoyuan = 4,
    /// 新竹
    Hsinchu = 5,
    /// 苗栗
    Miaoli = 6,
    /// 台中
    Taichung = 7,
    /// 彰化
    Changhua = 8,
    /// 雲林
    Yunlin = 9,
    /// 嘉義
    Chiayi = 10,
    /// 台南
    Tainan = 11,
    /// 左營
    Zuoying = 12,
}

/// 全部車站，依代碼排序
pub const ALL_STATIONS: [Station; 12] = [
    Station::Nangang,
    Station::Taipei,
    Station::Banqiao,
    Station::Taoyuan,
    Station::Hsinchu,
    Station::Miaoli,
    Station::Taichung,
    Station::Changhua,
    Station::Yunlin,
    Station::Chiayi,
    Station::Tainan,
    Station::Zuoying,
];

impl Station {
    /// 取得車站代碼
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 取得中文顯示名稱
    pub fn name(self) -> &'static str {
        match self {
            Station::Nangang => "南港",
            Station::Taipei => "台北",
            Station::Banqiao => "板橋",
            Station::Taoyuan => "桃園",
            Station::Hsinchu => "新竹",
            Station::Miaoli => "苗栗",
            Station::Taichung => "台中",
            Station::Changhua => "彰化",
            Station::Yunlin => "雲林",
            Station::Chiayi => "嘉義",
            Station::Tainan => "台南",
            Station::Zuoying => "左營",
        }
    }

    /// 從代碼解析車站
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Station::Nangang),
            2 => Some(Station::Taipei),
            3 => Some(Station::Banqiao),
            4 => Some(Station::Taoyuan),
            5 => Some(Station::Hsinchu),
            6 => Some(Station::Miaoli),
            7 => Some(Station::Taichung),
            8 => Some(Station::Changhua),
            9 => Some(Station::Yunlin),
            10 => Some(Station::Chiayi),
            11 => Some(Station::Tainan),
            12 => Some(Station::Zuoying),
            _ => None,
        }
    }

    /// 從英文枚舉名稱解析車站
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "Nangang" => Some(Station::Nangang),
            "Taipei" => Some(Station::Taipei),
            "Banqiao" => Some(Station::Banqiao),
            "Taoyuan" => Some(Station::Taoyuan),
            "Hsinchu" => Some(Station::Hsinchu),
            "Miaoli" => Some(Station::Miaoli),
            "Taichung" => Some(Station::Taichung),
            "Changhua" => Some(Station::Changhua),
            "Yunlin" => Some(Station::Yunlin),
            "Chiayi" => Some(Station::Chiayi),
            "Tainan" => Some(Station::Tainan),
            "Zuoying" => Some(Station::Zuoying),
            _ => None,
        }
    }

    /// 解析使用者輸入的車站
    ///
    /// 依序嘗試：中文顯示名稱 → 英文名稱 → 代碼數字（1~12）。
    pub fn resolve(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();

        if let Some(&code) = STATION_NAME_MAP.get(trimmed) {
            if let Some(station) = Self::from_code(code) {
                return Ok(station);
            }
        }

        if let Some(station) = Self::from_key(trimmed) {
            return Ok(station);
        }

        if let Ok(code) = trimmed.parse::<u8>() {
            if let Some(station) = Self::from_code(code) {
                return Ok(station);
            }
        }

        let valid_names = ALL_STATIONS
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ValidationError::InvalidStation {
            input: trimmed.to_string(),
            valid_names,
        }
        .into())
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_every_display_name() {
        for station in ALL_STATIONS {
            assert_eq!(Station::resolve(station.name()).unwrap(), station);
        }
    }

    #[test]
    fn resolve_by_key_and_code() {
        assert_eq!(Station::resolve("Taipei").unwrap(), Station::Taipei);
        assert_eq!(Station::resolve("12").unwrap(), Station::Zuoying);
        assert_eq!(Station::resolve(" 左營 ").unwrap(), Station::Zuoying);
    }

    #[test]
    fn resolve_invalid_lists_valid_names() {
        let err = Station::resolve("火星").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("火星"));
        assert!(msg.contains("南港"));
        assert!(msg.contains("左營"));
    }

    #[test]
    fn code_is_bijective() {
        for station in ALL_STATIONS {
            assert_eq!(Station::from_code(station.code()).unwrap(), station);
        }
        assert!(Station::from_code(0).is_none());
        assert!(Station::from_code(13).is_none());
    }
}
