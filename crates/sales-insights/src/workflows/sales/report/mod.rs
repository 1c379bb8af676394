mod currency;
pub mod views;

pub use currency::format_currency;

use serde::Serialize;
use views::{DailyTotalEntry, InsightSummary};

/// Sum of sales for one distinct date label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: String,
    pub total: f64,
}

impl DailyTotal {
    pub fn new(date: impl Into<String>, total: f64) -> Self {
        Self {
            date: date.into(),
            total,
        }
    }
}

/// Metrics derived from one dataset. Built only by the engine, in full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub total_sales: f64,
    pub average_order_value: f64,
    pub top_category: String,
    /// One entry per distinct date, sorted by label.
    pub daily_totals: Vec<DailyTotal>,
    /// Subset of `daily_totals` dates, same order.
    pub anomaly_dates: Vec<String>,
}

impl MetricsReport {
    pub fn daily_total(&self, date: &str) -> Option<f64> {
        self.daily_totals
            .iter()
            .find(|day| day.date == date)
            .map(|day| day.total)
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomaly_dates.is_empty()
    }

    pub fn summary(&self) -> InsightSummary {
        let anomaly_message = if self.has_anomalies() {
            format!("Anomalies Detected on: {}", self.anomaly_dates.join(", "))
        } else {
            "No anomalies detected in daily sales.".to_string()
        };

        let daily_totals = self
            .daily_totals
            .iter()
            .map(|day| DailyTotalEntry {
                date: day.date.clone(),
                total: day.total,
                total_display: format_currency(day.total),
                anomalous: self.anomaly_dates.contains(&day.date),
            })
            .collect();

        InsightSummary {
            total_sales: format_currency(self.total_sales),
            average_order_value: format_currency(self.average_order_value),
            top_category: self.top_category.clone(),
            daily_totals,
            anomaly_dates: self.anomaly_dates.clone(),
            anomaly_message,
        }
    }
}
