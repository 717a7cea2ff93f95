//! Prometheus exporter

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

/// Install the global Prometheus recorder
///
/// Can only succeed once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("relay_requests_total", "Chat turns by outcome");
    metrics::describe_histogram!("relay_stage_latency_ms", "Latency of each pipeline stage");
    metrics::describe_counter!("relay_degraded_total", "Stages that fell back to a degraded result");
    metrics::describe_counter!("relay_escalations_total", "Turns that triggered the escalation signal");
    Ok(handle)
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
