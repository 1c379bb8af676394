use metrics_exporter_prometheus::PrometheusHandle;
use sales_insights::config::InsightConfig;
use sales_insights::workflows::sales::{InsightEngine, ReportRenderer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) insights: Arc<InsightService>,
}

/// Engine and renderer configured once at startup and shared by every
/// request and CLI run.
#[derive(Debug, Clone)]
pub(crate) struct InsightService {
    pub(crate) engine: InsightEngine,
    pub(crate) renderer: ReportRenderer,
    pub(crate) preview_rows: usize,
}

impl InsightService {
    pub(crate) fn from_config(config: &InsightConfig) -> Self {
        Self {
            engine: InsightEngine::new(config.anomaly_ratio),
            renderer: ReportRenderer::new(config.report_title.clone()),
            preview_rows: config.preview_rows,
        }
    }
}

impl Default for InsightService {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}
