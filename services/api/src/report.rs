use crate::infra::InsightService;
use clap::{Args, ValueEnum};
use sales_insights::config::AppConfig;
use sales_insights::error::AppError;
use sales_insights::telemetry;
use sales_insights::workflows::sales::report::views::InsightSummary;
use sales_insights::workflows::sales::{Dataset, DatasetPreview, DocumentFormat};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Pdf,
    Text,
}

impl From<FormatArg> for DocumentFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => DocumentFormat::Pdf,
            FormatArg::Text => DocumentFormat::Text,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV export with date, category and sales columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the document (defaults to report.pdf / report.txt)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Document format
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    pub(crate) format: FormatArg,
    /// Print the first rows of the dataset before the insights
    #[arg(long)]
    pub(crate) preview: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = InsightService::from_config(&config.insights);

    let output = write_report(&service, args)?;
    println!("\nReport written to {}", output.display());
    Ok(())
}

/// Prints the summary before rendering so the metrics stay visible even
/// when the document cannot be produced.
pub(crate) fn write_report(service: &InsightService, args: ReportArgs) -> Result<PathBuf, AppError> {
    let ReportArgs {
        input,
        output,
        format,
        preview,
    } = args;
    let format = DocumentFormat::from(format);

    let dataset = Dataset::from_path(&input)?;
    if preview {
        render_preview(&dataset.preview(service.preview_rows));
    }

    let metrics = service.engine.compute(&dataset)?;
    render_summary(&input, dataset.len(), &metrics.summary());

    let document = service.renderer.render_as(&metrics, format)?;
    let output = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
    std::fs::write(&output, &document)?;

    info!(path = %output.display(), bytes = document.len(), "sales report written");
    Ok(output)
}

fn render_preview(preview: &DatasetPreview) {
    println!("Data preview (first {} rows)", preview.rows.len());
    println!("{}", preview.headers.join(" | "));
    for row in &preview.rows {
        println!("{}", row.join(" | "));
    }
    println!();
}

fn render_summary(input: &Path, rows: usize, summary: &InsightSummary) {
    println!("Sales insights for {} ({rows} rows)", input.display());
    println!("Total Sales: {}", summary.total_sales);
    println!("Average Order Value: {}", summary.average_order_value);
    println!("Top Selling Category: {}", summary.top_category);

    println!("\nDaily totals");
    for day in &summary.daily_totals {
        let marker = if day.anomalous { " (anomaly)" } else { "" };
        println!("- {}: {}{}", day.date, day.total_display, marker);
    }

    println!("\n{}", summary.anomaly_message);
}
