use std::fmt;

/// 應用程式錯誤類型
#[derive(Debug)]
pub enum AppError {
    /// 輸入驗證錯誤
    Validation(ValidationError),
    /// 頁面結構錯誤
    Page(PageError),
    /// 傳輸層錯誤
    Transport(TransportError),
    /// 訂票流程錯誤
    Booking(BookingError),
    /// 設定檔錯誤
    Config(ConfigError),
    /// 其他錯誤（用於包裝第三方函式庫錯誤）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "輸入錯誤: {}", e),
            AppError::Page(e) => write!(f, "頁面結構錯誤: {}", e),
            AppError::Transport(e) => write!(f, "連線錯誤: {}", e),
            AppError::Booking(e) => write!(f, "訂票錯誤: {}", e),
            AppError::Config(e) => write!(f, "設定檔錯誤: {}", e),
            AppError::Other(msg) => write!(f, "錯誤: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Page(e) => Some(e),
            AppError::Transport(e) => Some(e),
            AppError::Booking(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 輸入驗證錯誤
///
/// 一律立即回報給使用者，不進行重試。
#[derive(Debug)]
pub enum ValidationError {
    /// 車站名稱無效
    InvalidStation {
        input: String,
        valid_names: String,
    },
    /// 出發站與到達站相同
    StationConflict {
        station: String,
    },
    /// 時間格式無效
    InvalidTimeFormat {
        input: String,
    },
    /// 時間不在可售時刻表中
    TimeNotAvailable {
        input: String,
        available: String,
    },
    /// 日期無效或超出可訂票範圍
    InvalidDate {
        input: String,
        reason: String,
    },
    /// 身分證字號格式無效
    InvalidPersonalId {
        reason: String,
    },
    /// 票數超出範圍
    InvalidTicketNum {
        input: String,
        max: u8,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidStation { input, valid_names } => {
                write!(f, "無效的車站名稱: {}。有效選項: {}", input, valid_names)
            }
            ValidationError::StationConflict { station } => {
                write!(f, "出發站與到達站不可相同: {}", station)
            }
            ValidationError::InvalidTimeFormat { input } => {
                write!(f, "無效的時間格式: {}，請使用 HH:MM 格式", input)
            }
            ValidationError::TimeNotAvailable { input, available } => {
                write!(f, "時間 {} 不在可售時刻表中。可選時間: {}", input, available)
            }
            ValidationError::InvalidDate { input, reason } => {
                write!(f, "無效的出發日期 {}: {}", input, reason)
            }
            ValidationError::InvalidPersonalId { reason } => {
                write!(f, "身分證字號無效: {}", reason)
            }
            ValidationError::InvalidTicketNum { input, max } => {
                write!(f, "票數 {} 無效，必須在 0~{} 之間", input, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 頁面結構錯誤
///
/// 表示遠端頁面的標記與程式預期不符，通常代表官網改版。
/// 屬於致命錯誤，不可重試，也不可默默以預設值帶過。
#[derive(Debug)]
pub enum PageError {
    /// 找不到預期的控制項群組
    MissingControl {
        selector: String,
    },
    /// 控制項群組中沒有任何被預選的選項
    NoSelectedOption {
        group: String,
    },
    /// 找不到驗證碼圖片
    MissingCaptchaImage,
    /// 班次資料列欄位缺漏
    MalformedTrainRow {
        field: String,
    },
    /// 訂票結果頁缺少欄位
    MissingResultField {
        field: String,
    },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::MissingControl { selector } => {
                write!(f, "頁面中找不到預期的元素: {}", selector)
            }
            PageError::NoSelectedOption { group } => {
                write!(f, "控制項群組 {} 中沒有被預選的選項", group)
            }
            PageError::MissingCaptchaImage => {
                write!(f, "頁面中找不到驗證碼圖片")
            }
            PageError::MalformedTrainRow { field } => {
                write!(f, "班次資料列缺少欄位: {}", field)
            }
            PageError::MissingResultField { field } => {
                write!(f, "訂票結果頁缺少欄位: {}", field)
            }
        }
    }
}

impl std::error::Error for PageError {}

/// 傳輸層錯誤
#[derive(Debug)]
pub enum TransportError {
    /// 網路請求失敗
    RequestFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 伺服器回應非預期的狀態碼
    BadStatus {
        url: String,
        status: u16,
    },
    /// 尚未取得連線階段（需先載入訂票頁）
    SessionMissing,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::RequestFailed { url, source } => {
                write!(f, "請求失敗 ({}): {}", url, source)
            }
            TransportError::BadStatus { url, status } => {
                write!(f, "伺服器回應異常狀態碼 {} ({})", status, url)
            }
            TransportError::SessionMissing => {
                write!(f, "尚未建立連線階段，請先載入訂票頁面")
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 訂票流程錯誤
#[derive(Debug)]
pub enum BookingError {
    /// 回應頁面中沒有任何班次資料列
    NoTrainAvailable,
    /// 伺服器回報查無可售車次（建議更改日期或時段）
    SoldOut {
        messages: Vec<String>,
    },
    /// 伺服器回報的其他錯誤訊息（原文轉述，流程中止）
    ServerReported {
        messages: Vec<String>,
    },
    /// 班次選擇序號超出範圍
    IndexOutOfRange {
        index: usize,
        max_index: usize,
    },
    /// 使用者取消訂票
    Aborted,
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::NoTrainAvailable => {
                write!(f, "回應頁面中沒有任何班次資料")
            }
            BookingError::SoldOut { messages } => {
                write!(
                    f,
                    "查無可售車次: {}。請更改出發日期或時段後重試",
                    messages.join("; ")
                )
            }
            BookingError::ServerReported { messages } => {
                write!(f, "伺服器回報錯誤: {}", messages.join("; "))
            }
            BookingError::IndexOutOfRange { index, max_index } => {
                write!(f, "班次序號 {} 超出範圍 [1, {}]", index, max_index)
            }
            BookingError::Aborted => {
                write!(f, "使用者取消訂票，未送出任何資料")
            }
        }
    }
}

impl std::error::Error for BookingError {}

/// 設定檔錯誤
#[derive(Debug)]
pub enum ConfigError {
    /// 設定檔不存在
    NotFound {
        path: String,
    },
    /// 設定檔解析失敗
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 缺少必要欄位
    MissingField {
        field: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound { path } => write!(f, "找不到設定檔: {}", path),
            ConfigError::ParseFailed { path, source } => {
                write!(f, "設定檔解析失敗 ({}): {}", path, source)
            }
            ConfigError::MissingField { field } => {
                write!(f, "設定檔缺少必要欄位: {}", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 從常見錯誤類型轉換 ==========
// 注意：不需要手動實作 From<AppError> for anyhow::Error，
// anyhow 已為所有實作 std::error::Error 的類型提供自動轉換

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::Page(err)
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::Transport(err)
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Booking(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON 序列化失敗: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(format!("IO 錯誤: {}", err))
    }
}

// ========== 便捷建構函式 ==========

impl AppError {
    /// 建立網路請求失敗錯誤
    pub fn request_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport(TransportError::RequestFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 建立設定檔解析錯誤
    pub fn config_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Config(ConfigError::ParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 類型別名 ==========

/// 應用程式結果類型
pub type AppResult<T> = Result<T, AppError>;
