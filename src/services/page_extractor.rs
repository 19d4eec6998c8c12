//! 頁面動態欄位解析 - 業務能力層
//!
//! 官網每次產生頁面時會重新決定預選的座位偏好、行程類型、
//! 查詢方式與會員選項，送出表單時必須原樣帶回。
//! 找不到預期元素一律回報結構錯誤，絕不默默使用預設值。

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppResult, PageError};

const SEAT_PREFER_GROUP: &str = "#BookingS1Form_seatCon_seatRadioGroup";
const TYPES_OF_TRIP_GROUP: &str = "#BookingS1Form_tripCon_typesoftrip";
const SEARCH_BY_GROUP: &str = "input[name='bookingMethod']";
const MEMBER_RADIO_GROUP: &str =
    "input[name='TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup']";
const CAPTCHA_IMG: &str = "#BookingS1Form_homeCaptcha_passCode";
const PASSENGER_ID_INPUT: &str = "input[name$='passengerDataIdNumber']";
const FARE_LABEL: &str = "span.ticket-type";

/// 成功進入第二頁時回應中必然出現的面板標記
const TRAIN_PANEL_MARKER: &str = "TrainQueryDataViewPanel";

/// 優惠票乘客的身分證輸入欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerIdSlot {
    /// 表單欄位名稱
    pub field_name: String,
    /// 乘客序號（頁面列順序）
    pub ordinal: usize,
    /// 票種標籤（如「敬老」、「愛心」）
    pub fare_label: String,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("內建 CSS selector 必定有效")
}

/// 在指定控制項群組中找出被預選的選項值
fn selected_value(html: &str, group_css: &'static str, marker: &str) -> AppResult<String> {
    let document = Html::parse_document(html);
    let group = document
        .select(&selector(group_css))
        .next()
        .ok_or_else(|| PageError::MissingControl {
            selector: group_css.to_string(),
        })?;

    for element in group.descendants().filter_map(ElementRef::wrap) {
        if element.value().attr(marker).is_some() {
            if let Some(value) = element.value().attr("value") {
                return Ok(value.to_string());
            }
        }
    }

    Err(PageError::NoSelectedOption {
        group: group_css.to_string(),
    }
    .into())
}

/// 在同名控制項清單中找出被勾選者的選項值
fn checked_value(html: &str, group_css: &'static str) -> AppResult<String> {
    let document = Html::parse_document(html);
    let sel = selector(group_css);
    let mut found_any = false;

    for element in document.select(&sel) {
        found_any = true;
        if element.value().attr("checked").is_some() {
            if let Some(value) = element.value().attr("value") {
                return Ok(value.to_string());
            }
        }
    }

    if found_any {
        Err(PageError::NoSelectedOption {
            group: group_css.to_string(),
        }
        .into())
    } else {
        Err(PageError::MissingControl {
            selector: group_css.to_string(),
        }
        .into())
    }
}

/// 解析預選的座位偏好
pub fn seat_prefer_value(html: &str) -> AppResult<String> {
    selected_value(html, SEAT_PREFER_GROUP, "selected")
}

/// 解析預選的行程類型（單程／去回程）
pub fn types_of_trip_value(html: &str) -> AppResult<String> {
    selected_value(html, TYPES_OF_TRIP_GROUP, "selected")
}

/// 解析預選的查詢方式（依時間／依車次）
pub fn search_by_value(html: &str) -> AppResult<String> {
    checked_value(html, SEARCH_BY_GROUP)
}

/// 解析第三頁預選的會員選項
pub fn member_radio_value(html: &str) -> AppResult<String> {
    checked_value(html, MEMBER_RADIO_GROUP)
}

/// 解析驗證碼圖片的相對網址
pub fn captcha_image_src(html: &str) -> AppResult<String> {
    let document = Html::parse_document(html);
    document
        .select(&selector(CAPTCHA_IMG))
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.to_string())
        .ok_or_else(|| PageError::MissingCaptchaImage.into())
}

/// 檢查回應中是否已出現班次資料（表示成功進入第二頁）
pub fn has_train_data(html: &str) -> bool {
    html.contains(TRAIN_PANEL_MARKER)
}

/// 解析優惠票乘客的身分證輸入欄位
///
/// 回傳依頁面順序排列的欄位清單；頁面沒有優惠票乘客時回傳空清單。
/// 每個欄位所屬區塊須帶有票種標籤，缺漏視為結構錯誤。
pub fn passenger_id_field_slots(html: &str) -> AppResult<Vec<PassengerIdSlot>> {
    let ordinal_re = Regex::new(r"passengerDataView:(\d+):").expect("內建正規表示式必定有效");
    let document = Html::parse_document(html);
    let fare_sel = selector(FARE_LABEL);

    let mut slots = Vec::new();
    for input in document.select(&selector(PASSENGER_ID_INPUT)) {
        let field_name = match input.value().attr("name") {
            Some(name) => name.to_string(),
            None => continue,
        };

        let ordinal = ordinal_re
            .captures(&field_name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(slots.len());

        let fare_label = enclosing_fare_label(input, &fare_sel).ok_or_else(|| {
            PageError::MissingControl {
                selector: format!("{} 的 {}", field_name, FARE_LABEL),
            }
        })?;

        slots.push(PassengerIdSlot {
            field_name,
            ordinal,
            fare_label,
        });
    }

    Ok(slots)
}

/// 往上層元素尋找票種標籤文字
fn enclosing_fare_label(input: ElementRef<'_>, fare_sel: &Selector) -> Option<String> {
    let mut node = input.parent();
    while let Some(parent) = node {
        if let Some(element) = ElementRef::wrap(parent) {
            if let Some(label) = element.select(fare_sel).next() {
                let text: String = label.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        node = parent.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKING_PAGE: &str = r#"
        <html><body>
          <form id="BookingS1Form">
            <select id="BookingS1Form_seatCon_seatRadioGroup">
              <option value="0">無</option>
              <option value="1" selected="selected">靠窗</option>
            </select>
            <select id="BookingS1Form_tripCon_typesoftrip">
              <option value="0" selected="selected">單程</option>
              <option value="1">去回程</option>
            </select>
            <input type="radio" name="bookingMethod" value="radio31" checked="checked"/>
            <input type="radio" name="bookingMethod" value="radio32"/>
            <img id="BookingS1Form_homeCaptcha_passCode" src="/IMINT/?捕獲碼"/>
          </form>
        </body></html>
    "#;

    #[test]
    fn extracts_preselected_values() {
        assert_eq!(seat_prefer_value(BOOKING_PAGE).unwrap(), "1");
        assert_eq!(types_of_trip_value(BOOKING_PAGE).unwrap(), "0");
        assert_eq!(search_by_value(BOOKING_PAGE).unwrap(), "radio31");
        assert_eq!(captcha_image_src(BOOKING_PAGE).unwrap(), "/IMINT/?捕獲碼");
    }

    #[test]
    fn missing_group_is_structure_error() {
        let err = seat_prefer_value("<html><body></body></html>").unwrap_err();
        assert!(err.to_string().contains("頁面結構錯誤"));
    }

    #[test]
    fn unmarked_group_is_structure_error() {
        let html = r#"
            <select id="BookingS1Form_seatCon_seatRadioGroup">
              <option value="0">無</option>
              <option value="1">靠窗</option>
            </select>
        "#;
        let err = seat_prefer_value(html).unwrap_err();
        assert!(err.to_string().contains("沒有被預選的選項"));
    }

    #[test]
    fn passenger_slots_in_page_order() {
        let html = r#"
            <div class="passenger-info">
              <span class="ticket-type">愛心</span>
              <input name="TicketPassengerInfoInputPanel:passengerDataView:1:passengerDataView2:passengerDataIdNumber"/>
            </div>
            <div class="passenger-info">
              <span class="ticket-type">敬老</span>
              <input name="TicketPassengerInfoInputPanel:passengerDataView:2:passengerDataView2:passengerDataIdNumber"/>
            </div>
        "#;
        let slots = passenger_id_field_slots(html).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].ordinal, 1);
        assert_eq!(slots[0].fare_label, "愛心");
        assert_eq!(slots[1].ordinal, 2);
        assert_eq!(slots[1].fare_label, "敬老");
    }

    #[test]
    fn no_discount_passengers_yields_empty() {
        assert!(passenger_id_field_slots("<html><body></body></html>")
            .unwrap()
            .is_empty());
    }
}
