use crate::infra::AppState;
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use sales_insights::error::AppError;
use sales_insights::workflows::sales::report::views::InsightSummary;
use sales_insights::workflows::sales::{Dataset, DatasetPreview, DocumentFormat, MetricsReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) format: DocumentFormat,
}

#[derive(Debug, Serialize)]
pub(crate) struct InsightResponse {
    pub(crate) rows: usize,
    pub(crate) preview: DatasetPreview,
    pub(crate) metrics: MetricsReport,
    pub(crate) summary: InsightSummary,
}

pub(crate) fn insight_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/insights", post(insights_endpoint))
        .route("/api/v1/insights/report", post(report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Accepts a CSV body and returns the computed metrics with a row preview.
pub(crate) async fn insights_endpoint(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<InsightResponse>, AppError> {
    let dataset = Dataset::from_reader(body.as_ref())?;
    let metrics = state.insights.engine.compute(&dataset)?;
    let summary = metrics.summary();

    Ok(Json(InsightResponse {
        rows: dataset.len(),
        preview: dataset.preview(state.insights.preview_rows),
        metrics,
        summary,
    }))
}

/// Accepts a CSV body and returns the rendered document as an attachment.
pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<ReportQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    let dataset = Dataset::from_reader(body.as_ref())?;
    let metrics = state.insights.engine.compute(&dataset)?;
    let document = state.insights.renderer.render_as(&metrics, query.format)?;

    info!(
        format = ?query.format,
        rows = dataset.len(),
        bytes = document.len(),
        "sales report rendered"
    );

    let headers = [
        (header::CONTENT_TYPE, query.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", query.format.file_name()),
        ),
    ];
    Ok((StatusCode::OK, headers, document).into_response())
}
