//! 伺服器錯誤訊息解析 - 業務能力層
//!
//! 官網以 feedbackPanelERROR 樣式嵌入人類可讀的錯誤訊息；
//! 訊息分類依繁體中文關鍵字比對。

use scraper::{Html, Selector};

const ERROR_FEEDBACK_SELECTOR: &str = "span.feedbackPanelERROR";

/// 驗證碼相關錯誤的關鍵字
const CAPTCHA_MARKERS: [&str; 2] = ["檢測碼", "驗證碼"];

/// 查無車次／售完的關鍵字
const NO_TRAIN_MARKERS: [&str; 2] = ["查無可售車次", "車票已售完"];

/// 解析頁面中的全部錯誤訊息（依頁面順序）
pub fn parse(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse(ERROR_FEEDBACK_SELECTOR).expect("內建 CSS selector 必定有效");

    document
        .select(&sel)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// 判斷是否為驗證碼相關錯誤
pub fn is_captcha_error(errors: &[String]) -> bool {
    errors
        .iter()
        .any(|err| CAPTCHA_MARKERS.iter().any(|marker| err.contains(marker)))
}

/// 判斷是否為查無可售車次錯誤
pub fn is_no_train_error(errors: &[String]) -> bool {
    errors
        .iter()
        .any(|err| NO_TRAIN_MARKERS.iter().any(|marker| err.contains(marker)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_messages_in_order() {
        let html = r#"
            <span class="feedbackPanelERROR">檢測碼輸入錯誤</span>
            <p>其他內容</p>
            <span class="feedbackPanelERROR">請重新輸入</span>
        "#;
        let errors = parse(html);
        assert_eq!(errors, vec!["檢測碼輸入錯誤", "請重新輸入"]);
    }

    #[test]
    fn clean_page_has_no_errors() {
        assert!(parse("<html><body><p>訂票成功</p></body></html>").is_empty());
    }

    #[test]
    fn classifies_captcha_errors() {
        let errors = vec!["檢測碼輸入錯誤".to_string()];
        assert!(is_captcha_error(&errors));
        assert!(!is_no_train_error(&errors));

        let errors = vec!["驗證碼已逾時".to_string()];
        assert!(is_captcha_error(&errors));
    }

    #[test]
    fn classifies_sold_out_errors() {
        let errors = vec!["很抱歉，查無可售車次，請更改日期".to_string()];
        assert!(is_no_train_error(&errors));
        assert!(!is_captcha_error(&errors));

        let errors = vec!["您選擇的車票已售完".to_string()];
        assert!(is_no_train_error(&errors));
    }

    #[test]
    fn other_messages_match_neither() {
        let errors = vec!["系統忙碌中，請稍後再試".to_string()];
        assert!(!is_captcha_error(&errors));
        assert!(!is_no_train_error(&errors));
    }
}
