//! 共用工具：終端互動與日誌

pub mod console;
pub mod logging;

pub use console::{confirm, prompt_or_default, Prompter, StdinPrompter};
