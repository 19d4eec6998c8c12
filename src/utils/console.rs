//! 終端互動工具
//!
//! 以 trait 抽象使用者輸入，流程層與編排層不直接碰 stdin，
//! 測試時換成腳本化實作即可。

use std::io::Write;

use crate::error::AppResult;

/// 使用者輸入能力
pub trait Prompter {
    /// 顯示提示並讀取一行輸入（去除行尾換行）
    fn read_line(&mut self, prompt: &str) -> AppResult<String>;
}

/// 標準輸入實作
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn read_line(&mut self, prompt: &str) -> AppResult<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// 讀取輸入，空白時回傳預設值
pub fn prompt_or_default(
    prompter: &mut impl Prompter,
    prompt: &str,
    default: &str,
) -> AppResult<String> {
    let input = prompter.read_line(prompt)?;
    if input.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.trim().to_string())
    }
}

/// 讀取是否確認（輸入 y 或 Y 視為確認，其他一律視為否）
pub fn confirm(prompter: &mut impl Prompter, prompt: &str) -> AppResult<bool> {
    let input = prompter.read_line(prompt)?;
    Ok(matches!(input.trim(), "y" | "Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 依序回覆預先排定答案的腳本化實作
    pub struct ScriptedPrompter {
        answers: Vec<String>,
        cursor: usize,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                cursor: 0,
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, _prompt: &str) -> AppResult<String> {
            let answer = self.answers.get(self.cursor).cloned().unwrap_or_default();
            self.cursor += 1;
            Ok(answer)
        }
    }

    #[test]
    fn blank_input_falls_back_to_default() {
        let mut prompter = ScriptedPrompter::new(&["", "台中"]);
        assert_eq!(prompt_or_default(&mut prompter, "站名：", "台北").unwrap(), "台北");
        assert_eq!(prompt_or_default(&mut prompter, "站名：", "台北").unwrap(), "台中");
    }

    #[test]
    fn confirm_requires_explicit_yes() {
        let mut prompter = ScriptedPrompter::new(&["y", "Y", "", "n", "yes"]);
        assert!(confirm(&mut prompter, "?").unwrap());
        assert!(confirm(&mut prompter, "?").unwrap());
        assert!(!confirm(&mut prompter, "?").unwrap());
        assert!(!confirm(&mut prompter, "?").unwrap());
        assert!(!confirm(&mut prompter, "?").unwrap());
    }
}
