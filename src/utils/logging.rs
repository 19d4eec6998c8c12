//! 日誌初始化

use tracing_subscriber::EnvFilter;

/// 初始化日誌
///
/// 預設等級 info，可用 RUST_LOG 環境變數覆寫。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
