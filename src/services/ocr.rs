//! 驗證碼識別能力 - 業務能力層
//!
//! 識別器為外部協作者：失敗以空字串表示，不得噴錯中斷流程。
//! 識別器實例於程式啟動時建立一次，整個流程共用同一個 handle。

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::warn;

/// 高鐵驗證碼可用字元（排除容易混淆的 0、1、I、O）
pub const CAPTCHA_CHARS: &str = "23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// 驗證碼識別能力
pub trait CaptchaSolver {
    /// 識別驗證碼圖片，失敗時回傳空字串
    fn solve(&self, image: &[u8]) -> String;
}

/// 未設定識別器時的替代實作，一律回傳空字串，
/// 使流程直接走手動輸入分支。
pub struct DisabledOcr;

impl CaptchaSolver for DisabledOcr {
    fn solve(&self, _image: &[u8]) -> String {
        String::new()
    }
}

/// 外部指令識別器
///
/// 將圖片 bytes 寫入指令的 stdin，從 stdout 讀取識別結果。
/// 指令由設定檔的 ocr_command 欄位指定。
pub struct CommandSolver {
    command: String,
}

impl CommandSolver {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CaptchaSolver for CommandSolver {
    fn solve(&self, image: &[u8]) -> String {
        match run_command(&self.command, image) {
            Ok(output) => normalize(&output),
            Err(e) => {
                warn!("驗證碼識別指令執行失敗: {}", e);
                String::new()
            }
        }
    }
}

fn run_command(command: &str, image: &[u8]) -> std::io::Result<String> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(image)?;
    }

    let output = child.wait_with_output()?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// 整理識別結果：轉大寫並過濾掉不在驗證碼字元集中的字元
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|c| CAPTCHA_CHARS.contains(*c))
        .collect()
}

/// 依設定建立識別器
pub fn from_config(ocr_command: Option<&str>) -> Box<dyn CaptchaSolver> {
    match ocr_command {
        Some(command) if !command.trim().is_empty() => Box::new(CommandSolver::new(command)),
        _ => {
            warn!("未設定 ocr_command，驗證碼將需要手動輸入");
            Box::new(DisabledOcr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uppercases_and_filters() {
        assert_eq!(normalize(" ab3d\n"), "AB3D");
        assert_eq!(normalize("a0o1i"), "A");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn disabled_ocr_returns_empty() {
        assert_eq!(DisabledOcr.solve(b"whatever"), "");
    }
}
