use anyhow::{Context, Result};
use tracing::error;

use thsr_booking::config::{self, Config};
use thsr_booking::orchestrator::{BookingFlow, Mode};
use thsr_booking::services::ocr;
use thsr_booking::utils::{logging, Prompter, StdinPrompter};
use thsr_booking::ThsrClient;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌
    logging::init();

    // 載入設定
    let config = Config::from_env();
    let profile = config::load_profile(&config.profile_path)?;

    println!("=== 高鐵訂票小幫手 ===");
    println!("1. 自動訂票（使用 {} 設定）", config.profile_path);
    println!("2. 手動訂票");
    println!();

    let mut prompter = StdinPrompter;
    let choice = prompter.read_line("請選擇模式（預設：1）：")?;
    let mode = if choice.trim() == "2" {
        Mode::Interactive
    } else {
        Mode::Auto
    };

    if mode == Mode::Auto && profile.is_none() {
        error!("錯誤：找不到 {} 設定檔", config.profile_path);
        error!("請複製 config.example.toml 為 {} 並填入設定", config.profile_path);
        anyhow::bail!("缺少設定檔");
    }

    // 識別器於啟動時建立一次，整個流程共用
    let solver = ocr::from_config(profile.as_ref().and_then(|p| p.ocr_command.as_deref()));

    let mut client = ThsrClient::new()?;
    let mut flow = BookingFlow::new(&mut client, solver.as_ref(), &mut prompter, &config);

    flow.run(mode, profile.as_ref())
        .await
        .context("訂票流程失敗")?;

    Ok(())
}
