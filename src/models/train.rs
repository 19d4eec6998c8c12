/// 無法解析旅程時間時使用的排序值，確保壞資料排在最後而非讓選擇流程崩潰
const UNPARSEABLE_MINUTES: u32 = 9999;

/// 單一班次
///
/// 由回應頁面解析而得，生命週期僅限一次回應，解析後不再變動。
/// form_value 為官網嵌入的選擇代碼，下一步送出表單時原樣帶回。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    /// 車次號
    pub id: String,
    /// 出發時間
    pub depart: String,
    /// 到達時間
    pub arrive: String,
    /// 旅程時間（"H:MM"）
    pub travel_time: String,
    /// 優惠標記（如 "(早鳥85折, 大學生75折)"，無則為空字串）
    pub discount: String,
    /// 表單選擇代碼
    pub form_value: String,
}

impl Train {
    /// 將旅程時間字串換算為總分鐘數
    ///
    /// 無法解析的字串回傳大數值，使其在最短旅程排序中排到最後。
    pub fn travel_minutes(&self) -> u32 {
        let parts: Vec<&str> = self.travel_time.split(':').collect();
        if parts.len() != 2 {
            return UNPARSEABLE_MINUTES;
        }
        match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
            (Ok(hours), Ok(minutes)) => hours * 60 + minutes,
            _ => UNPARSEABLE_MINUTES,
        }
    }
}

impl std::fmt::Display for Train {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>4} {}~{} ({}) {}",
            self.id, self.depart, self.arrive, self.travel_time, self.discount
        )
    }
}
