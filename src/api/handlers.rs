use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use super::static_files::serve_embedded;
use crate::activity::{Identity, Report, WatchReportEngine};

pub struct AppState {
    pub engine: WatchReportEngine,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Daily watch-time report for the caller.
///
/// Always answers 200: anonymous callers and upstream failures get demo or
/// mixed data, flagged in the body and in `x-watchtime-data`. The time spent
/// building the report is returned in `x-watchtime-report-ms`.
pub async fn get_watch_history(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Response {
    let started = Instant::now();
    let report = state.engine.get_watch_report(&identity).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        authenticated = identity.is_authenticated(),
        is_demo = report.summary.is_demo,
        is_mixed = report.summary.is_mixed,
        real_records = report.summary.real_data_count,
        total_records = report.watch_history.len(),
        elapsed_ms,
        "served watch report"
    );

    let mut headers = HeaderMap::new();
    headers.insert("x-watchtime-data", HeaderValue::from_static(data_kind(&report)));
    headers.insert("x-watchtime-report-ms", HeaderValue::from(elapsed_ms));

    (headers, Json(report)).into_response()
}

fn data_kind(report: &Report) -> &'static str {
    if report.summary.is_demo {
        "demo"
    } else if report.summary.is_mixed {
        "mixed"
    } else {
        "real"
    }
}

pub async fn index_page() -> Response {
    serve_embedded("index.html").await
}

pub async fn dashboard_page() -> Response {
    serve_embedded("dashboard.html").await
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
