//! 業務能力層：頁面解析、錯誤訊息分類、班次選擇、驗證碼識別與身分證檢核

pub mod booking_result;
pub mod error_feedback;
pub mod id_policy;
pub mod ocr;
pub mod page_extractor;
pub mod train_catalog;

pub use booking_result::BookingResult;
pub use id_policy::{check_duplicate_ids, validate_personal_id, DuplicateReport, PassengerIdEntry};
pub use ocr::{CaptchaSolver, CommandSolver, DisabledOcr, CAPTCHA_CHARS};
pub use page_extractor::PassengerIdSlot;
pub use train_catalog::TrainCatalog;
