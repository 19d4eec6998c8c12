//! 流程層：三個頁面各自的完整處理流程

pub mod confirm_ticket;
pub mod confirm_train;
pub mod first_page;

pub use confirm_ticket::ConfirmTicketFlow;
pub use confirm_train::{ConfirmTrainFlow, TrainSelection};
pub use first_page::{build_booking_request_interactive, FirstPageFlow};
