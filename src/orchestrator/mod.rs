//! 編排層：完整訂票流程的階段串接

pub mod booking;

pub use booking::{ensure_no_server_errors, BookingFlow, Mode};
