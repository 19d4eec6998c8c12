//! 高鐵訂票網站 HTTP 客戶端
//!
//! 唯一持有連線資源（reqwest::Client 與 cookie 階段）的模組，
//! 對外只暴露「取頁面／送表單」能力。

use std::collections::HashMap;

use tracing::debug;

use crate::error::{AppError, AppResult, TransportError};
use crate::services::page_extractor;

const BASE_URL: &str = "https://irs.thsrc.com.tw";
const BOOKING_PAGE_URL: &str = "https://irs.thsrc.com.tw/IMINT/?locale=tw";
const SUBMIT_FORM_URL: &str =
    "https://irs.thsrc.com.tw/IMINT/;jsessionid={}?wicket:interface=:0:BookingS1Form::IFormSubmitListener";
const CONFIRM_TRAIN_URL: &str =
    "https://irs.thsrc.com.tw/IMINT/?wicket:interface=:1:BookingS2Form::IFormSubmitListener";
const CONFIRM_TICKET_URL: &str =
    "https://irs.thsrc.com.tw/IMINT/?wicket:interface=:2:BookingS3Form::IFormSubmitListener";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.100 Safari/537.36";

/// 訂票網站存取能力
///
/// 每個方法都是一次循序 await 的網路往返，整個流程不並行。
#[allow(async_fn_in_trait)]
pub trait BookingGateway {
    /// 載入第一頁訂票表單
    async fn fetch_booking_page(&mut self) -> AppResult<String>;
    /// 下載頁面中的驗證碼圖片
    async fn fetch_captcha_image(&mut self, page_html: &str) -> AppResult<Vec<u8>>;
    /// 送出第一頁訂票表單
    async fn submit_booking_form(&mut self, params: HashMap<String, String>) -> AppResult<String>;
    /// 送出第二頁班次選擇
    async fn submit_train(&mut self, params: HashMap<String, String>) -> AppResult<String>;
    /// 送出第三頁乘客資訊
    async fn submit_ticket(&mut self, params: HashMap<String, String>) -> AppResult<String>;
}

/// reqwest 實作
///
/// jsessionid 於載入訂票頁時從 cookie 擷取，
/// 第一頁表單的送出網址需要帶上它。
pub struct ThsrClient {
    client: reqwest::Client,
    session_id: Option<String>,
}

impl ThsrClient {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::request_failed(BASE_URL, e))?;

        Ok(Self {
            client,
            session_id: None,
        })
    }

    async fn post_form(&self, url: &str, params: &HashMap<String, String>) -> AppResult<String> {
        debug!("POST {} ({} 個欄位)", url, params.len());
        let resp = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;
        ensure_ok(&resp, url)?;
        resp.text()
            .await
            .map_err(|e| AppError::request_failed(url, e))
    }
}

fn ensure_ok(resp: &reqwest::Response, url: &str) -> AppResult<()> {
    let status = resp.status();
    if !status.is_success() {
        return Err(TransportError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    Ok(())
}

impl BookingGateway for ThsrClient {
    async fn fetch_booking_page(&mut self) -> AppResult<String> {
        debug!("GET {}", BOOKING_PAGE_URL);
        let resp = self
            .client
            .get(BOOKING_PAGE_URL)
            .send()
            .await
            .map_err(|e| AppError::request_failed(BOOKING_PAGE_URL, e))?;
        ensure_ok(&resp, BOOKING_PAGE_URL)?;

        if let Some(cookie) = resp.cookies().find(|c| c.name() == "JSESSIONID") {
            self.session_id = Some(cookie.value().to_string());
        }

        resp.text()
            .await
            .map_err(|e| AppError::request_failed(BOOKING_PAGE_URL, e))
    }

    async fn fetch_captcha_image(&mut self, page_html: &str) -> AppResult<Vec<u8>> {
        let src = page_extractor::captcha_image_src(page_html)?;
        let url = format!("{}{}", BASE_URL, src);

        debug!("下載驗證碼圖片: {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;
        ensure_ok(&resp, &url)?;

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;
        Ok(bytes.to_vec())
    }

    async fn submit_booking_form(&mut self, params: HashMap<String, String>) -> AppResult<String> {
        let session_id = self
            .session_id
            .as_deref()
            .ok_or(TransportError::SessionMissing)?;
        let url = SUBMIT_FORM_URL.replace("{}", session_id);
        self.post_form(&url, &params).await
    }

    async fn submit_train(&mut self, params: HashMap<String, String>) -> AppResult<String> {
        self.post_form(CONFIRM_TRAIN_URL, &params).await
    }

    async fn submit_ticket(&mut self, params: HashMap<String, String>) -> AppResult<String> {
        self.post_form(CONFIRM_TICKET_URL, &params).await
    }
}
