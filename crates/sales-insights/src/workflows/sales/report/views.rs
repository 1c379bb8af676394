use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DailyTotalEntry {
    pub date: String,
    pub total: f64,
    pub total_display: String,
    pub anomalous: bool,
}

/// Display-ready rendition of a [`super::MetricsReport`].
#[derive(Debug, Clone, Serialize)]
pub struct InsightSummary {
    pub total_sales: String,
    pub average_order_value: String,
    pub top_category: String,
    pub daily_totals: Vec<DailyTotalEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomaly_dates: Vec<String>,
    pub anomaly_message: String,
}
