use super::dataset::{Dataset, SalesRecord};
use super::report::{DailyTotal, MetricsReport};
use std::collections::HashMap;
use tracing::debug;

/// Days below this fraction of the mean daily total are flagged.
pub const DEFAULT_ANOMALY_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsightError {
    #[error("dataset is missing required column '{column}'")]
    Schema { column: &'static str },
    #[error("dataset contains no rows")]
    EmptyDataset,
    #[error("row {row}: sales value '{value}' is not a number")]
    InvalidSales { row: usize, value: String },
    #[error("sales totals exceed the representable range")]
    NonFiniteTotal,
    #[error("anomaly ratio {ratio} must be finite and greater than zero")]
    InvalidAnomalyRatio { ratio: f64 },
}

/// Computes a [`MetricsReport`] from a sales dataset. Holds no state beyond
/// the anomaly ratio, so one engine can serve any number of runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightEngine {
    anomaly_ratio: f64,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ANOMALY_RATIO)
    }
}

impl InsightEngine {
    /// The ratio is validated by [`InsightEngine::compute`], not here.
    pub fn new(anomaly_ratio: f64) -> Self {
        Self { anomaly_ratio }
    }

    pub fn anomaly_ratio(&self) -> f64 {
        self.anomaly_ratio
    }

    /// All-or-nothing: either every metric is computed or an error is
    /// returned, never a partially filled report.
    pub fn compute(&self, dataset: &Dataset) -> Result<MetricsReport, InsightError> {
        if !self.anomaly_ratio.is_finite() || self.anomaly_ratio <= 0.0 {
            return Err(InsightError::InvalidAnomalyRatio {
                ratio: self.anomaly_ratio,
            });
        }

        let records = dataset.sales_records()?;
        if records.is_empty() {
            return Err(InsightError::EmptyDataset);
        }

        let total_sales = total_sales(&records);
        if !total_sales.is_finite() {
            return Err(InsightError::NonFiniteTotal);
        }
        let average_order_value = total_sales / records.len() as f64;
        let top_category = top_category(&records).ok_or(InsightError::EmptyDataset)?;
        let daily_totals = daily_totals(&records);
        let anomaly_dates = anomaly_dates(&daily_totals, self.anomaly_ratio)?;

        debug!(
            rows = records.len(),
            dates = daily_totals.len(),
            anomalies = anomaly_dates.len(),
            "sales insights computed"
        );

        Ok(MetricsReport {
            total_sales,
            average_order_value,
            top_category,
            daily_totals,
            anomaly_dates,
        })
    }
}

fn total_sales(records: &[SalesRecord]) -> f64 {
    records.iter().map(|record| record.sales).sum()
}

/// Most frequent category; ties go to the one seen first.
fn top_category(records: &[SalesRecord]) -> Option<String> {
    // category -> (first row index, count)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        counts.entry(record.category.as_str()).or_insert((index, 0)).1 += 1;
    }

    counts
        .into_iter()
        .min_by(|(_, (first_a, count_a)), (_, (first_b, count_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        })
        .map(|(category, _)| category.to_string())
}

fn daily_totals(records: &[SalesRecord]) -> Vec<DailyTotal> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<DailyTotal> = Vec::new();

    for record in records {
        match positions.get(record.date.as_str()) {
            Some(&position) => totals[position].total += record.sales,
            None => {
                positions.insert(record.date.as_str(), totals.len());
                totals.push(DailyTotal::new(record.date.clone(), record.sales));
            }
        }
    }

    totals.sort_by(|a, b| a.date.cmp(&b.date));
    totals
}

/// Dates whose total is strictly below `ratio * mean`. With an all-zero
/// series the threshold is zero and nothing qualifies.
fn anomaly_dates(daily_totals: &[DailyTotal], ratio: f64) -> Result<Vec<String>, InsightError> {
    if daily_totals.is_empty() {
        return Ok(Vec::new());
    }

    let mean = daily_totals.iter().map(|day| day.total).sum::<f64>() / daily_totals.len() as f64;
    if !mean.is_finite() {
        return Err(InsightError::NonFiniteTotal);
    }
    let threshold = mean * ratio;

    Ok(daily_totals
        .iter()
        .filter(|day| day.total < threshold)
        .map(|day| day.date.clone())
        .collect())
}
