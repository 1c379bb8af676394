mod document;
mod pdf;
mod text;

pub use document::DocumentWriter;
pub use pdf::PdfDocument;
pub use text::TextDocument;

use super::report::{format_currency, MetricsReport};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_TITLE: &str = "E-commerce Sales Report";
pub const NO_ANOMALIES_LINE: &str = "No anomalies detected.";
pub const ANOMALIES_PREFIX: &str = "Anomalies Detected on: ";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("character {character:?} in \"{line}\" cannot be encoded in the document")]
    UnsupportedCharacter { character: char, line: String },
    #[error("document serialization failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Output encodings the renderer can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Pdf => mime::APPLICATION_PDF,
            Self::Text => mime::TEXT_PLAIN_UTF_8,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }

    pub fn file_name(self) -> String {
        format!("report.{}", self.extension())
    }
}

/// Turns a [`MetricsReport`] into a fixed-layout document: a title followed
/// by the total, average, top category and anomaly lines, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRenderer {
    title: String,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_TITLE)
    }
}

impl ReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body lines below the title.
    pub fn lines(report: &MetricsReport) -> Vec<String> {
        let anomalies = if report.anomaly_dates.is_empty() {
            NO_ANOMALIES_LINE.to_string()
        } else {
            format!("{ANOMALIES_PREFIX}{}", report.anomaly_dates.join(", "))
        };

        vec![
            format!("Total Sales: {}", format_currency(report.total_sales)),
            format!(
                "Average Order Value: {}",
                format_currency(report.average_order_value)
            ),
            format!("Top Category: {}", report.top_category),
            anomalies,
        ]
    }

    pub fn render(&self, report: &MetricsReport) -> Result<Vec<u8>, RenderError> {
        self.render_with(report, PdfDocument::new())
    }

    pub fn render_as(
        &self,
        report: &MetricsReport,
        format: DocumentFormat,
    ) -> Result<Vec<u8>, RenderError> {
        match format {
            DocumentFormat::Pdf => self.render_with(report, PdfDocument::new()),
            DocumentFormat::Text => self.render_with(report, TextDocument::new()),
        }
    }

    pub fn render_with<W: DocumentWriter>(
        &self,
        report: &MetricsReport,
        mut writer: W,
    ) -> Result<Vec<u8>, RenderError> {
        writer.emit_title(&self.title)?;
        for line in Self::lines(report) {
            writer.emit_line(&line)?;
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sales::report::DailyTotal;

    #[derive(Default)]
    struct RecordingWriter {
        calls: Vec<String>,
    }

    impl DocumentWriter for RecordingWriter {
        fn emit_title(&mut self, text: &str) -> Result<(), RenderError> {
            self.calls.push(format!("title:{text}"));
            Ok(())
        }

        fn emit_line(&mut self, text: &str) -> Result<(), RenderError> {
            self.calls.push(format!("line:{text}"));
            Ok(())
        }

        fn finish(self) -> Result<Vec<u8>, RenderError> {
            Ok(self.calls.join("\n").into_bytes())
        }
    }

    fn report(anomaly_dates: &[&str]) -> MetricsReport {
        MetricsReport {
            total_sales: 1234567.891,
            average_order_value: 411.5,
            top_category: "Home & Garden".to_string(),
            daily_totals: vec![DailyTotal::new("2024-01-01", 1234567.891)],
            anomaly_dates: anomaly_dates.iter().map(|date| date.to_string()).collect(),
        }
    }

    #[test]
    fn render_with_emits_title_then_lines_in_order() {
        let bytes = ReportRenderer::default()
            .render_with(&report(&["2024-01-03", "2024-01-07"]), RecordingWriter::default())
            .expect("render succeeds");

        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "title:E-commerce Sales Report\n\
line:Total Sales: $1,234,567.89\n\
line:Average Order Value: $411.50\n\
line:Top Category: Home & Garden\n\
line:Anomalies Detected on: 2024-01-03, 2024-01-07"
        );
    }

    #[test]
    fn lines_fall_back_to_no_anomalies_message() {
        let lines = ReportRenderer::lines(&report(&[]));
        assert_eq!(lines.last().map(String::as_str), Some(NO_ANOMALIES_LINE));
        assert!(!lines.iter().any(|line| line.starts_with(ANOMALIES_PREFIX)));
    }

    #[test]
    fn document_format_metadata() {
        assert_eq!(DocumentFormat::Pdf.content_type(), mime::APPLICATION_PDF);
        assert_eq!(DocumentFormat::Text.file_name(), "report.txt");
        assert_eq!(DocumentFormat::default(), DocumentFormat::Pdf);
    }
}
