//! Sales insight pipeline: CSV dataset -> [`MetricsReport`] -> document bytes.

pub mod dataset;
mod engine;
pub mod render;
pub mod report;

pub use dataset::{Dataset, DatasetError, DatasetPreview, SalesRecord};
pub use engine::{InsightEngine, InsightError, DEFAULT_ANOMALY_RATIO};
pub use render::{
    DocumentFormat, DocumentWriter, PdfDocument, RenderError, ReportRenderer, TextDocument,
    DEFAULT_REPORT_TITLE,
};
pub use report::{DailyTotal, MetricsReport};
