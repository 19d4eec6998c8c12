//! 第一頁訂票流程 - 流程層
//!
//! 職責：把使用者資料與頁面動態欄位合併成完整表單，
//! 並以有界重試的方式解決驗證碼：
//! 自動識別 → 失敗重試（重新取頁面與圖片）→ 次數用盡改手動輸入。

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::BookingGateway;
use crate::config::{Config, Profile};
use crate::error::AppResult;
use crate::models::{
    ensure_distinct_stations, list_available_hhmm, parse_outbound_date, to_params, BookingRequest,
    Station, TicketCounts, TimeSlot, ALL_STATIONS, ALL_TICKET_TYPES, DAYS_BEFORE_BOOKING_AVAILABLE,
    MAX_TICKET_NUM,
};
use crate::services::ocr::CaptchaSolver;
use crate::services::{error_feedback, page_extractor};
use crate::utils::console::{prompt_or_default, Prompter};

/// 頁面動態欄位
///
/// 官網每次產生頁面都會重新決定這些值，送出表單時必須原樣帶回；
/// 重試驗證碼時沿用舊頁面的值是錯的，必須隨新頁面重新解析。
#[derive(Debug, Clone)]
struct DynamicFields {
    seat_prefer: String,
    types_of_trip: String,
    search_by: String,
}

impl DynamicFields {
    fn extract(html: &str) -> AppResult<Self> {
        Ok(Self {
            seat_prefer: page_extractor::seat_prefer_value(html)?,
            types_of_trip: page_extractor::types_of_trip_value(html)?,
            search_by: page_extractor::search_by_value(html)?,
        })
    }
}

/// 第一頁訂票流程
pub struct FirstPageFlow<'a, G: BookingGateway, P: Prompter> {
    gateway: &'a mut G,
    solver: &'a dyn CaptchaSolver,
    prompter: &'a mut P,
    max_retries: usize,
    retry_delay: Duration,
    step_delay: Duration,
}

impl<'a, G: BookingGateway, P: Prompter> FirstPageFlow<'a, G, P> {
    pub fn new(
        gateway: &'a mut G,
        solver: &'a dyn CaptchaSolver,
        prompter: &'a mut P,
        config: &Config,
    ) -> Self {
        Self {
            gateway,
            solver,
            prompter,
            max_retries: config.max_captcha_retry,
            retry_delay: Duration::from_secs(config.captcha_retry_secs),
            step_delay: Duration::from_millis(config.step_delay_ms),
        }
    }

    /// 送出第一頁表單並取得回應
    ///
    /// 驗證碼錯誤在此吸收重試；其他伺服器錯誤原樣回傳，
    /// 讓編排層檢視回應中的錯誤訊息後決定去留。
    pub async fn run(&mut self, request: &BookingRequest) -> AppResult<String> {
        info!("正在載入訂票頁面...");
        let mut page = self.gateway.fetch_booking_page().await?;
        sleep(self.step_delay).await;
        let mut image = self.gateway.fetch_captcha_image(&page).await?;
        let mut dynamic = DynamicFields::extract(&page)?;

        let mut retry_count = 0usize;
        loop {
            let use_manual = retry_count >= self.max_retries;
            let security_code = self.input_captcha(&image, use_manual)?;

            let form = request.to_booking_form(
                dynamic.seat_prefer.as_str(),
                dynamic.types_of_trip.as_str(),
                dynamic.search_by.as_str(),
                security_code,
            );
            let params = to_params(&form)?;

            info!("正在提交訂票表單...");
            sleep(self.step_delay).await;
            let resp = self.gateway.submit_booking_form(params).await?;

            // 已出現班次資料即成功進入第二頁
            if page_extractor::has_train_data(&resp) {
                return Ok(resp);
            }

            let errors = error_feedback::parse(&resp);
            if !error_feedback::is_captcha_error(&errors) {
                // 非驗證碼錯誤，返回讓上層處理
                return Ok(resp);
            }

            retry_count += 1;
            if use_manual {
                // 手動輸入也失敗，不再重試
                return Ok(resp);
            }

            warn!(
                "驗證碼錯誤，正在重試... ({}/{})",
                retry_count, self.max_retries
            );
            sleep(self.retry_delay).await;

            page = self.gateway.fetch_booking_page().await?;
            image = self.gateway.fetch_captcha_image(&page).await?;
            dynamic = DynamicFields::extract(&page)?;
        }
    }

    /// 取得驗證碼文字
    ///
    /// 自動分支：識別成功直接採用。
    /// 手動分支：存圖供檢視，有識別結果時按 Enter 採用、輸入覆寫；
    /// 沒有識別結果就等待使用者輸入。
    fn input_captcha(&mut self, image: &[u8], force_manual: bool) -> AppResult<String> {
        let guess = self.solver.solve(image);

        if !force_manual && !guess.is_empty() {
            info!("驗證碼自動識別: {}", guess);
            return Ok(guess);
        }

        let path = save_captcha_image(image)?;
        info!("請開啟圖片檢視驗證碼: {}", path.display());

        if !guess.is_empty() {
            info!("驗證碼識別結果: {}", guess);
            let input = self
                .prompter
                .read_line("按 Enter 確認，或輸入正確的驗證碼：")?;
            if input.trim().is_empty() {
                Ok(guess)
            } else {
                Ok(input.trim().to_string())
            }
        } else {
            let input = self.prompter.read_line("請手動輸入驗證碼：")?;
            Ok(input.trim().to_string())
        }
    }
}

/// 將驗證碼圖片存到暫存目錄供使用者檢視
fn save_captcha_image(image: &[u8]) -> AppResult<PathBuf> {
    let path = std::env::temp_dir().join("thsr_captcha.jpg");
    std::fs::write(&path, image)?;
    Ok(path)
}

/// 互動模式：逐項詢問訂票資料
///
/// 設定檔已填的欄位直接採用不再詢問；完全沒有設定檔時全部逐項詢問。
pub fn build_booking_request_interactive(
    profile: Option<&Profile>,
    prompter: &mut impl Prompter,
) -> AppResult<BookingRequest> {
    let today = Local::now().date_naive();

    let start_station = match profile.and_then(|p| p.start_station.as_deref()) {
        Some(name) => Station::resolve(name)?,
        None => select_station(prompter, "啟程", Station::Taipei)?,
    };
    let dest_station = match profile.and_then(|p| p.dest_station.as_deref()) {
        Some(name) => Station::resolve(name)?,
        None => select_station(prompter, "到達", Station::Zuoying)?,
    };
    ensure_distinct_stations(start_station, dest_station)?;

    let outbound_date = match profile.and_then(|p| p.outbound_date.as_deref()) {
        Some(date) => parse_outbound_date(date, today)?,
        None => select_date(prompter, today)?,
    };

    let outbound_time = match profile.and_then(|p| p.outbound_time.as_deref()) {
        Some(time) => TimeSlot::from_hhmm(time)?,
        None => select_time(prompter)?,
    };

    let tickets = match profile {
        Some(p) => {
            p.tickets.validate()?;
            p.tickets.clone()
        }
        None => select_ticket_counts(prompter)?,
    };

    Ok(BookingRequest {
        start_station,
        dest_station,
        outbound_date,
        outbound_time,
        tickets,
        personal_id: profile
            .and_then(|p| p.personal_id.clone())
            .unwrap_or_default(),
        phone: profile.map(|p| p.phone.clone()).unwrap_or_default(),
        email: profile.map(|p| p.email.clone()).unwrap_or_default(),
        passenger_ids: profile
            .map(|p| p.passenger_ids.clone())
            .unwrap_or_default(),
    })
}

fn select_station(
    prompter: &mut impl Prompter,
    travel_type: &str,
    default: Station,
) -> AppResult<Station> {
    println!("選擇{}站：", travel_type);
    for station in ALL_STATIONS {
        println!("{}. {}", station.code(), station.name());
    }

    let input = prompt_or_default(
        prompter,
        &format!("輸入選擇（預設：{}）：", default.code()),
        &default.code().to_string(),
    )?;
    Station::resolve(&input)
}

fn select_date(prompter: &mut impl Prompter, today: chrono::NaiveDate) -> AppResult<String> {
    let last_available = today + chrono::Duration::days(DAYS_BEFORE_BOOKING_AVAILABLE);
    let input = prompt_or_default(
        prompter,
        &format!(
            "選擇出發日期（{}~{}）（預設為今日）：",
            today.format("%Y-%m-%d"),
            last_available.format("%Y-%m-%d")
        ),
        &today.format("%Y-%m-%d").to_string(),
    )?;
    parse_outbound_date(&input, today)
}

fn select_time(prompter: &mut impl Prompter) -> AppResult<TimeSlot> {
    println!("選擇出發時間：");
    for (idx, hhmm) in list_available_hhmm().iter().enumerate() {
        println!("{}. {}", idx + 1, hhmm);
    }

    let input = prompt_or_default(prompter, "輸入選擇（預設：10）：", "10")?;
    match input.parse::<usize>().ok().and_then(TimeSlot::from_index) {
        Some(slot) => Ok(slot),
        None => TimeSlot::from_hhmm(&input),
    }
}

fn select_ticket_counts(prompter: &mut impl Prompter) -> AppResult<TicketCounts> {
    let mut counts = TicketCounts::default();
    for ticket_type in ALL_TICKET_TYPES {
        let default = counts.count(ticket_type);
        let input = prompt_or_default(
            prompter,
            &format!(
                "選擇{}票數（0~{}）（預設：{}）：",
                ticket_type.name(),
                MAX_TICKET_NUM,
                default
            ),
            &default.to_string(),
        )?;
        let count = input.parse::<u8>().unwrap_or(default);
        counts.set_count(ticket_type, count);
    }
    counts.validate()?;
    Ok(counts)
}
