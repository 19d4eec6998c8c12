//! 班次列表解析與選擇 - 業務能力層
//!
//! 只負責「從回應頁面取得班次」與「依策略選擇一班」兩件事；
//! 售完與否的判斷屬於錯誤訊息分類，由呼叫端先行檢查。

use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::{AppResult, BookingError, PageError};
use crate::models::Train;

const TRAIN_ROW: &str = "label.result-item";
const TRAIN_ID: &str = "#QueryCode";
const TRAIN_DEPART: &str = "#QueryDeparture";
const TRAIN_ARRIVE: &str = "#QueryArrival";
const TRAIN_DURATION: &str = ".duration";
const EARLY_BIRD_DISCOUNT: &str = ".early-bird";
const COLLEGE_DISCOUNT: &str = ".student";
const FORM_VALUE_INPUT: &str = "input[name='TrainQueryDataViewPanel:TrainGroup']";

/// 一次查詢回應中的全部班次
#[derive(Debug, Clone)]
pub struct TrainCatalog {
    trains: Vec<Train>,
}

impl TrainCatalog {
    /// 解析回應頁面中的班次列表
    ///
    /// 找不到任何班次資料列即回傳錯誤；呼叫端須先檢查伺服器
    /// 錯誤訊息，以區分「售完」與真正的頁面結構問題。
    pub fn parse(html: &str) -> AppResult<Self> {
        let document = Html::parse_document(html);
        let row_sel = selector(TRAIN_ROW);

        let mut trains = Vec::new();
        for row in document.select(&row_sel) {
            trains.push(parse_row(row)?);
        }

        if trains.is_empty() {
            return Err(BookingError::NoTrainAvailable.into());
        }

        Ok(Self { trains })
    }

    /// 取得全部班次（依頁面順序）
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// 選擇乘車時間最短的班次
    ///
    /// 同長以頁面順序先出現者優先；空列表回傳 None。
    pub fn select_shortest_travel_time(&self) -> Option<&Train> {
        let mut best: Option<&Train> = None;
        for train in &self.trains {
            match best {
                Some(current) if train.travel_minutes() >= current.travel_minutes() => {}
                _ => best = Some(train),
            }
        }
        best
    }

    /// 依序號選擇班次（1-based）
    ///
    /// 超出範圍回傳 None，由呼叫端決定如何回報。
    pub fn select_by_index(&self, one_based: usize) -> Option<&Train> {
        if one_based == 0 {
            return None;
        }
        self.trains.get(one_based - 1)
    }

    /// 以清單形式記錄全部班次
    pub fn log_trains(&self) {
        info!("可選班次：");
        for (idx, train) in self.trains.iter().enumerate() {
            info!("{}. {}", idx + 1, train);
        }
    }
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("內建 CSS selector 必定有效")
}

fn row_text(row: ElementRef<'_>, css: &'static str) -> Option<String> {
    row.select(&selector(css))
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn parse_row(row: ElementRef<'_>) -> AppResult<Train> {
    let id = row_text(row, TRAIN_ID).ok_or_else(|| malformed("車次號"))?;
    let depart = row_text(row, TRAIN_DEPART).ok_or_else(|| malformed("出發時間"))?;
    let arrive = row_text(row, TRAIN_ARRIVE).ok_or_else(|| malformed("到達時間"))?;
    let travel_time = row_text(row, TRAIN_DURATION).ok_or_else(|| malformed("旅程時間"))?;

    let form_value = row
        .select(&selector(FORM_VALUE_INPUT))
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| value.to_string())
        .ok_or_else(|| malformed("表單選擇代碼"))?;

    Ok(Train {
        id,
        depart,
        arrive,
        travel_time,
        discount: parse_discount(row),
        form_value,
    })
}

/// 合併早鳥與大學生優惠標記，無優惠時回傳空字串
fn parse_discount(row: ElementRef<'_>) -> String {
    let mut discounts = Vec::new();
    if let Some(text) = row_text(row, EARLY_BIRD_DISCOUNT) {
        if !text.is_empty() {
            discounts.push(text);
        }
    }
    if let Some(text) = row_text(row, COLLEGE_DISCOUNT) {
        if !text.is_empty() {
            discounts.push(text);
        }
    }

    if discounts.is_empty() {
        String::new()
    } else {
        format!("({})", discounts.join(", "))
    }
}

fn malformed(field: &str) -> PageError {
    PageError::MalformedTrainRow {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_row(id: &str, travel_time: &str, form_value: &str, discount: &str) -> String {
        format!(
            r#"<label class="result-item">
                 <span id="QueryCode">{id}</span>
                 <span id="QueryDeparture">09:00</span>
                 <span id="QueryArrival">10:30</span>
                 <span class="duration">{travel_time}</span>
                 {discount}
                 <input name="TrainQueryDataViewPanel:TrainGroup" value="{form_value}"/>
               </label>"#
        )
    }

    fn catalog_of(rows: &[String]) -> TrainCatalog {
        let html = format!("<html><body>{}</body></html>", rows.join("\n"));
        TrainCatalog::parse(&html).unwrap()
    }

    #[test]
    fn parses_rows_with_discounts() {
        let catalog = catalog_of(&[
            train_row("0803", "1:30", "radio17", r#"<p class="early-bird">早鳥85折</p>"#),
            train_row("1511", "0:45", "radio19", ""),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.trains()[0].id, "0803");
        assert_eq!(catalog.trains()[0].discount, "(早鳥85折)");
        assert_eq!(catalog.trains()[1].discount, "");
        assert_eq!(catalog.trains()[1].form_value, "radio19");
    }

    #[test]
    fn empty_page_is_no_train_error() {
        let err = TrainCatalog::parse("<html><body></body></html>").unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Booking(BookingError::NoTrainAvailable)
        ));
    }

    #[test]
    fn selects_shortest_travel_time() {
        let catalog = catalog_of(&[
            train_row("0803", "01:30", "radio17", ""),
            train_row("1511", "00:45", "radio19", ""),
            train_row("0115", "02:00", "radio21", ""),
        ]);
        let selected = catalog.select_shortest_travel_time().unwrap();
        assert_eq!(selected.id, "1511");
        assert_eq!(selected.travel_time, "00:45");
    }

    #[test]
    fn tie_break_keeps_first_row() {
        let catalog = catalog_of(&[
            train_row("0803", "00:30", "radio17", ""),
            train_row("1511", "00:30", "radio19", ""),
        ]);
        assert_eq!(catalog.select_shortest_travel_time().unwrap().id, "0803");
    }

    #[test]
    fn malformed_duration_sorts_last() {
        let catalog = catalog_of(&[
            train_row("0803", "壞資料", "radio17", ""),
            train_row("1511", "01:30", "radio19", ""),
        ]);
        assert_eq!(catalog.select_shortest_travel_time().unwrap().id, "1511");
    }

    #[test]
    fn select_by_index_is_one_based_and_fails_closed() {
        let catalog = catalog_of(&[
            train_row("0803", "01:30", "radio17", ""),
            train_row("1511", "00:45", "radio19", ""),
        ]);
        assert_eq!(catalog.select_by_index(1).unwrap().id, "0803");
        assert_eq!(catalog.select_by_index(2).unwrap().id, "1511");
        assert!(catalog.select_by_index(0).is_none());
        assert!(catalog.select_by_index(3).is_none());
    }
}
