use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// 第一頁訂票表單（BookingS1Form）
///
/// 欄位名稱對應官網 Wicket 表單的 name 屬性；
/// seat_prefer / types_of_trip / search_by 由頁面動態解析取得，不可寫死。
#[derive(Debug, Clone, Serialize)]
pub struct BookingForm {
    #[serde(rename = "selectStartStation")]
    pub start_station: u8,
    #[serde(rename = "selectDestinationStation")]
    pub dest_station: u8,
    #[serde(rename = "bookingMethod")]
    pub search_by: String,
    #[serde(rename = "tripCon:typesoftrip")]
    pub types_of_trip: String,
    #[serde(rename = "seatCon:seatRadioGroup")]
    pub seat_prefer: String,
    #[serde(rename = "toTimeInputField")]
    pub outbound_date: String,
    #[serde(rename = "toTimeTable")]
    pub outbound_time: String,
    #[serde(rename = "toTrainIDInputField")]
    pub to_train_id: String,
    #[serde(rename = "trainCon:trainRadioGroup")]
    pub class_type: u8,
    #[serde(rename = "ticketPanel:rows:0:ticketAmount")]
    pub adult_ticket_num: String,
    #[serde(rename = "ticketPanel:rows:1:ticketAmount")]
    pub child_ticket_num: String,
    #[serde(rename = "ticketPanel:rows:2:ticketAmount")]
    pub disabled_ticket_num: String,
    #[serde(rename = "ticketPanel:rows:3:ticketAmount")]
    pub elder_ticket_num: String,
    #[serde(rename = "ticketPanel:rows:4:ticketAmount")]
    pub college_ticket_num: String,
    #[serde(rename = "ticketPanel:rows:5:ticketAmount")]
    pub youth_ticket_num: String,
    #[serde(rename = "homeCaptcha:securityCode")]
    pub security_code: String,
    #[serde(rename = "BookingS1Form:hf:0")]
    pub form_mark: String,
}

/// 第二頁班次確認表單（BookingS2Form）
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmTrainForm {
    #[serde(rename = "TrainQueryDataViewPanel:TrainGroup")]
    pub selected_train: String,
    #[serde(rename = "BookingS2Form:hf:0")]
    pub form_mark: String,
}

impl ConfirmTrainForm {
    /// 以選定班次的表單代碼建構
    pub fn new(selected_train: impl Into<String>) -> Self {
        Self {
            selected_train: selected_train.into(),
            form_mark: String::new(),
        }
    }
}

/// 第三頁乘客資訊表單（BookingS3FormSP）
///
/// 優惠票乘客的個別身分證欄位名稱由頁面動態決定，
/// 於送出前直接塞入扁平化後的參數表（見 ConfirmTicketFlow）。
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmTicketForm {
    #[serde(rename = "dummyId")]
    pub personal_id: String,
    #[serde(rename = "dummyPhone")]
    pub phone_num: String,
    #[serde(rename = "email")]
    pub email: String,
    #[serde(rename = "TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup")]
    pub member_radio: String,
    #[serde(rename = "idInputRadio")]
    pub id_input_radio: u8,
    #[serde(rename = "diffOver")]
    pub diff_over: u8,
    #[serde(rename = "agree")]
    pub agree: String,
    #[serde(rename = "isGoBackM")]
    pub go_back_m: String,
    #[serde(rename = "backHome")]
    pub back_home: String,
    #[serde(rename = "TgoError")]
    pub tgo_error: String,
    #[serde(rename = "BookingS3FormSP:hf:0")]
    pub form_mark: String,
}

impl ConfirmTicketForm {
    pub fn new(
        personal_id: impl Into<String>,
        phone_num: impl Into<String>,
        email: impl Into<String>,
        member_radio: impl Into<String>,
    ) -> Self {
        Self {
            personal_id: personal_id.into(),
            phone_num: phone_num.into(),
            email: email.into(),
            member_radio: member_radio.into(),
            id_input_radio: 0,
            diff_over: 1,
            agree: "on".to_string(),
            go_back_m: String::new(),
            back_home: String::new(),
            tgo_error: "1".to_string(),
            form_mark: String::new(),
        }
    }
}

/// 將表單模型扁平化為送出用的參數表
///
/// 數值欄位轉為字串，與官網表單編碼一致。
pub fn to_params<T: Serialize>(form: &T) -> AppResult<HashMap<String, String>> {
    let value = serde_json::to_value(form)?;
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::Other("表單模型必須序列化為物件".to_string()))?;

    let mut params = HashMap::with_capacity(obj.len());
    for (key, val) in obj {
        let encoded = match val {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        params.insert(key.clone(), encoded);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_params_flattens_by_alias() {
        let form = ConfirmTrainForm::new("radio17");
        let params = to_params(&form).unwrap();
        assert_eq!(
            params.get("TrainQueryDataViewPanel:TrainGroup").unwrap(),
            "radio17"
        );
        assert_eq!(params.get("BookingS2Form:hf:0").unwrap(), "");
    }

    #[test]
    fn numeric_fields_become_strings() {
        let form = ConfirmTicketForm::new("A123456789", "0912345678", "", "radio21");
        let params = to_params(&form).unwrap();
        assert_eq!(params.get("idInputRadio").unwrap(), "0");
        assert_eq!(params.get("diffOver").unwrap(), "1");
        assert_eq!(params.get("agree").unwrap(), "on");
        assert_eq!(params.get("dummyId").unwrap(), "A123456789");
    }
}
