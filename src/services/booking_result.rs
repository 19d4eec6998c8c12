//! 訂票結果頁解析 - 業務能力層

use scraper::{Html, Selector};
use tracing::info;

use crate::error::{AppResult, PageError};

const PNR_CODE: &str = "p.pnr-code > span";
const PAYMENT_DEADLINE: &str = "p.payment-status";
const TOTAL_PRICE: &str = "#setTrainTotalPriceValue";

/// 訂票結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingResult {
    /// 訂位代號
    pub pnr: String,
    /// 付款期限
    pub payment_deadline: String,
    /// 總金額
    pub total_price: String,
}

/// 解析訂票結果頁
pub fn parse(html: &str) -> AppResult<BookingResult> {
    let document = Html::parse_document(html);

    Ok(BookingResult {
        pnr: text_of(&document, PNR_CODE, "訂位代號")?,
        payment_deadline: text_of(&document, PAYMENT_DEADLINE, "付款期限")?,
        total_price: text_of(&document, TOTAL_PRICE, "總金額")?,
    })
}

/// 記錄訂票結果
pub fn show(result: &BookingResult) {
    info!("{}", "=".repeat(40));
    info!("🎫 訂票成功");
    info!("訂位代號: {}", result.pnr);
    info!("付款期限: {}", result.payment_deadline);
    info!("總金額: {}", result.total_price);
    info!("{}", "=".repeat(40));
}

fn text_of(document: &Html, css: &'static str, field: &str) -> AppResult<String> {
    let sel = Selector::parse(css).expect("內建 CSS selector 必定有效");
    document
        .select(&sel)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            PageError::MissingResultField {
                field: field.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_result_page() {
        let html = r#"
            <p class="pnr-code"><span>09326417</span></p>
            <p class="payment-status">2026/08/10 23:59</p>
            <span id="setTrainTotalPriceValue">1,490</span>
        "#;
        let result = parse(html).unwrap();
        assert_eq!(result.pnr, "09326417");
        assert_eq!(result.payment_deadline, "2026/08/10 23:59");
        assert_eq!(result.total_price, "1,490");
    }

    #[test]
    fn missing_pnr_is_structure_error() {
        let err = parse("<html><body></body></html>").unwrap_err();
        assert!(err.to_string().contains("訂位代號"));
    }
}
