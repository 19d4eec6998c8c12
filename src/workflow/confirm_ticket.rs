//! 第三頁乘客資訊流程 - 流程層
//!
//! 收集訂票人資料與優惠票乘客的個別身分證，執行重複字號檢查，
//! 發現重複時必須取得使用者明確同意才送出，否則整筆訂票中止。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::BookingGateway;
use crate::config::Config;
use crate::error::{AppResult, BookingError};
use crate::models::{to_params, BookingRequest, ConfirmTicketForm};
use crate::services::id_policy::{check_duplicate_ids, validate_personal_id, PassengerIdEntry};
use crate::services::page_extractor;
use crate::utils::console::{confirm, Prompter};

/// 第三頁乘客資訊流程
pub struct ConfirmTicketFlow<'a, G: BookingGateway, P: Prompter> {
    gateway: &'a mut G,
    prompter: &'a mut P,
    step_delay: Duration,
}

impl<'a, G: BookingGateway, P: Prompter> ConfirmTicketFlow<'a, G, P> {
    pub fn new(gateway: &'a mut G, prompter: &'a mut P, config: &Config) -> Self {
        Self {
            gateway,
            prompter,
            step_delay: Duration::from_millis(config.step_delay_ms),
        }
    }

    pub async fn run(&mut self, train_resp: &str, request: &BookingRequest) -> AppResult<String> {
        let member_radio = page_extractor::member_radio_value(train_resp)?;
        let slots = page_extractor::passenger_id_field_slots(train_resp)?;

        let personal_id = self.resolve_personal_id(request)?;
        let phone_num = self.resolve_phone(request)?;

        let form = ConfirmTicketForm::new(
            personal_id.clone(),
            phone_num,
            request.email.clone(),
            member_radio,
        );
        let mut params = to_params(&form)?;

        if !slots.is_empty() {
            info!("偵測到 {} 位乘客需要填寫身分證", slots.len());
            let entries = self.collect_passenger_ids(&slots, request, &personal_id)?;
            self.ensure_duplicates_confirmed(&entries)?;

            for entry in entries {
                params.insert(entry.field_name, entry.id_value);
            }
        }

        info!("正在提交乘客資訊...");
        sleep(self.step_delay).await;
        self.gateway.submit_ticket(params).await
    }

    /// 取得訂票人身分證：設定檔優先，缺了才詢問
    fn resolve_personal_id(&mut self, request: &BookingRequest) -> AppResult<String> {
        let id = if request.personal_id.is_empty() {
            self.prompter.read_line("輸入身分證字號：")?.trim().to_string()
        } else {
            request.personal_id.clone()
        };
        validate_personal_id(&id)?;
        Ok(id)
    }

    fn resolve_phone(&mut self, request: &BookingRequest) -> AppResult<String> {
        if request.phone.is_empty() {
            Ok(self
                .prompter
                .read_line("輸入手機號碼（預設：\"\"）：")?
                .trim()
                .to_string())
        } else {
            Ok(request.phone.clone())
        }
    }

    /// 逐一收集優惠票乘客的身分證
    ///
    /// 取值順序：設定檔預填字號 → 互動輸入（空白採用訂票人字號）。
    fn collect_passenger_ids(
        &mut self,
        slots: &[page_extractor::PassengerIdSlot],
        request: &BookingRequest,
        personal_id: &str,
    ) -> AppResult<Vec<PassengerIdEntry>> {
        let mut entries = Vec::with_capacity(slots.len());

        for (idx, slot) in slots.iter().enumerate() {
            let id_value = match request.passenger_ids.get(idx) {
                Some(predefined) => predefined.clone(),
                None => {
                    let input = self.prompter.read_line(&format!(
                        "輸入第 {} 位乘客（{}）的身分證字號（預設：訂票人）：",
                        slot.ordinal,
                        slot.fare_label
                    ))?;
                    if input.trim().is_empty() {
                        personal_id.to_string()
                    } else {
                        input.trim().to_string()
                    }
                }
            };
            validate_personal_id(&id_value)?;

            entries.push(PassengerIdEntry {
                field_name: slot.field_name.clone(),
                ordinal: slot.ordinal,
                fare_label: slot.fare_label.clone(),
                id_value,
            });
        }

        Ok(entries)
    }

    /// 重複字號需要使用者明確同意才能送出
    fn ensure_duplicates_confirmed(&mut self, entries: &[PassengerIdEntry]) -> AppResult<()> {
        let report = check_duplicate_ids(entries);
        if !report.has_duplicates() {
            return Ok(());
        }

        for warning in &report.warnings {
            warn!("⚠️ {}", warning);
        }
        for violation in &report.violations {
            warn!("⚠️ {}", violation);
        }

        if confirm(&mut *self.prompter, "仍要繼續訂票嗎？(y/N)：")? {
            Ok(())
        } else {
            Err(BookingError::Aborted.into())
        }
    }
}
