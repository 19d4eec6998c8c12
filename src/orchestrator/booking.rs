//! 訂票編排 - 編排層
//!
//! 依序執行三個頁面流程；任一階段出現伺服器回報的錯誤
//! 即中止並轉述，流程不會自行修復非驗證碼的錯誤。

use chrono::Local;
use tracing::info;

use crate::clients::BookingGateway;
use crate::config::{Config, Profile};
use crate::error::{AppResult, BookingError, ConfigError};
use crate::services::booking_result::{self, BookingResult};
use crate::services::ocr::CaptchaSolver;
use crate::services::error_feedback;
use crate::utils::console::Prompter;
use crate::workflow::{
    build_booking_request_interactive, ConfirmTicketFlow, ConfirmTrainFlow, FirstPageFlow,
    TrainSelection,
};

/// 訂票模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 自動：設定檔供資料，班次取乘車時間最短者
    Auto,
    /// 互動：逐項詢問，班次由使用者選擇
    Interactive,
}

/// 訂票流程編排
pub struct BookingFlow<'a, G: BookingGateway, P: Prompter> {
    gateway: &'a mut G,
    solver: &'a dyn CaptchaSolver,
    prompter: &'a mut P,
    config: &'a Config,
}

impl<'a, G: BookingGateway, P: Prompter> BookingFlow<'a, G, P> {
    pub fn new(
        gateway: &'a mut G,
        solver: &'a dyn CaptchaSolver,
        prompter: &'a mut P,
        config: &'a Config,
    ) -> Self {
        Self {
            gateway,
            solver,
            prompter,
            config,
        }
    }

    /// 執行完整訂票流程，成功時回傳解析後的訂票結果
    pub async fn run(&mut self, mode: Mode, profile: Option<&Profile>) -> AppResult<BookingResult> {
        let request = match mode {
            Mode::Auto => {
                let profile = profile.ok_or_else(|| ConfigError::NotFound {
                    path: self.config.profile_path.clone(),
                })?;
                profile.to_booking_request(Local::now().date_naive())?
            }
            Mode::Interactive => build_booking_request_interactive(profile, &mut *self.prompter)?,
        };

        info!("出發站：{}", request.start_station);
        info!("到達站：{}", request.dest_station);
        info!("出發日期：{}", request.outbound_date);
        info!("出發時間：{}", request.outbound_time);

        // 第一頁：訂票表單（含驗證碼重試）
        let book_resp = FirstPageFlow::new(
            &mut *self.gateway,
            self.solver,
            &mut *self.prompter,
            self.config,
        )
        .run(&request)
        .await?;
        ensure_no_server_errors(&book_resp)?;

        // 第二頁：班次確認
        let selection = match mode {
            Mode::Auto => TrainSelection::Shortest,
            Mode::Interactive => TrainSelection::Prompt,
        };
        let train_resp = ConfirmTrainFlow::new(
            &mut *self.gateway,
            &mut *self.prompter,
            selection,
            self.config,
        )
        .run(&book_resp)
        .await?;
        ensure_no_server_errors(&train_resp)?;

        // 第三頁：乘客資訊
        let ticket_resp =
            ConfirmTicketFlow::new(&mut *self.gateway, &mut *self.prompter, self.config)
                .run(&train_resp, &request)
                .await?;
        ensure_no_server_errors(&ticket_resp)?;

        let result = booking_result::parse(&ticket_resp)?;
        booking_result::show(&result);
        info!("請使用官方提供的管道完成後續付款以及取票!!");

        Ok(result)
    }
}

/// 檢查回應中的伺服器錯誤訊息
///
/// 查無車次／售完是使用者可處理的情況，與其他錯誤分開回報。
pub fn ensure_no_server_errors(html: &str) -> AppResult<()> {
    let errors = error_feedback::parse(html);
    if errors.is_empty() {
        return Ok(());
    }

    if error_feedback::is_no_train_error(&errors) {
        return Err(BookingError::SoldOut { messages: errors }.into());
    }
    Err(BookingError::ServerReported { messages: errors }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn clean_page_passes() {
        assert!(ensure_no_server_errors("<html><body>ok</body></html>").is_ok());
    }

    #[test]
    fn sold_out_is_classified_specially() {
        let html = r#"<span class="feedbackPanelERROR">很抱歉，查無可售車次</span>"#;
        let err = ensure_no_server_errors(html).unwrap_err();
        assert!(matches!(
            err,
            AppError::Booking(BookingError::SoldOut { .. })
        ));
    }

    #[test]
    fn other_messages_are_server_reported() {
        let html = r#"<span class="feedbackPanelERROR">系統忙碌中</span>"#;
        let err = ensure_no_server_errors(html).unwrap_err();
        assert!(matches!(
            err,
            AppError::Booking(BookingError::ServerReported { .. })
        ));
    }
}
