//! # THSR Booking
//!
//! 台灣高鐵訂票自動化工具
//!
//! ## 架構設計
//!
//! 本系統採用分層架構：
//!
//! ### ① 遠端能力層（Clients）
//! - `clients/` - 持有連線資源（reqwest::Client 與 cookie 階段）
//! - `ThsrClient` - 唯一的連線持有者，提供取頁面／送表單能力
//!
//! ### ② 業務能力層（Services）
//! - `services/` - 描述「我能做什麼」，不關心流程順序
//! - `page_extractor` - 頁面動態欄位解析能力
//! - `error_feedback` - 伺服器錯誤訊息解析與分類能力
//! - `TrainCatalog` - 班次列表解析與選擇能力
//! - `ocr` - 驗證碼識別能力（外部協作者）
//! - `id_policy` - 身分證格式與重複字號檢核能力
//!
//! ### ③ 流程層（Workflow）
//! - `workflow/` - 定義每一頁的完整處理流程
//! - `FirstPageFlow` - 表單合併 + 驗證碼有界重試
//! - `ConfirmTrainFlow` - 班次選擇與送出
//! - `ConfirmTicketFlow` - 乘客資訊與重複字號確認
//!
//! ### ④ 編排層（Orchestration）
//! - `orchestrator/` - 串接三個階段，錯誤即中止

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新匯出常用類型
pub use clients::{BookingGateway, ThsrClient};
pub use config::{Config, Profile};
pub use error::{AppError, AppResult};
pub use models::{BookingRequest, Station, TicketType, TimeSlot, Train};
pub use orchestrator::{BookingFlow, Mode};
pub use services::{BookingResult, CaptchaSolver, TrainCatalog};
pub use utils::{Prompter, StdinPrompter};
