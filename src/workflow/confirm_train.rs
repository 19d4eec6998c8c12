//! 第二頁班次確認流程 - 流程層

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::clients::BookingGateway;
use crate::config::Config;
use crate::error::{AppResult, BookingError};
use crate::models::{to_params, ConfirmTrainForm, Train};
use crate::services::TrainCatalog;
use crate::utils::console::{prompt_or_default, Prompter};

/// 班次選擇策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainSelection {
    /// 自動選擇乘車時間最短的班次
    Shortest,
    /// 詢問使用者輸入序號（1-based）
    Prompt,
}

/// 第二頁班次確認流程
pub struct ConfirmTrainFlow<'a, G: BookingGateway, P: Prompter> {
    gateway: &'a mut G,
    prompter: &'a mut P,
    selection: TrainSelection,
    step_delay: Duration,
}

impl<'a, G: BookingGateway, P: Prompter> ConfirmTrainFlow<'a, G, P> {
    pub fn new(
        gateway: &'a mut G,
        prompter: &'a mut P,
        selection: TrainSelection,
        config: &Config,
    ) -> Self {
        Self {
            gateway,
            prompter,
            selection,
            step_delay: Duration::from_millis(config.step_delay_ms),
        }
    }

    /// 解析班次列表、依策略選擇一班並送出
    ///
    /// 呼叫端須先確認回應中沒有伺服器錯誤訊息（售完等），
    /// 這裡的空列表一律視為結構問題。
    pub async fn run(&mut self, book_resp: &str) -> AppResult<String> {
        let catalog = TrainCatalog::parse(book_resp)?;
        catalog.log_trains();

        let selected = self.select(&catalog)?;
        info!(
            "已選擇班次：{} ({}) {}",
            selected.id, selected.travel_time, selected.discount
        );

        let form = ConfirmTrainForm::new(selected.form_value.clone());
        let params = to_params(&form)?;

        info!("正在提交班次選擇...");
        sleep(self.step_delay).await;
        self.gateway.submit_train(params).await
    }

    fn select<'c>(&mut self, catalog: &'c TrainCatalog) -> AppResult<&'c Train> {
        match self.selection {
            TrainSelection::Shortest => catalog
                .select_shortest_travel_time()
                .ok_or_else(|| BookingError::NoTrainAvailable.into()),
            TrainSelection::Prompt => {
                let input = prompt_or_default(&mut *self.prompter, "輸入選擇（預設：1）：", "1")?;
                let index = input.parse::<usize>().unwrap_or(0);
                // 超出範圍直接回報，不悄悄夾限
                catalog.select_by_index(index).ok_or_else(|| {
                    BookingError::IndexOutOfRange {
                        index,
                        max_index: catalog.len(),
                    }
                    .into()
                })
            }
        }
    }
}
