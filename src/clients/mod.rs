//! 遠端能力層：官網 HTTP 存取

pub mod thsr_client;

pub use thsr_client::{BookingGateway, ThsrClient};
