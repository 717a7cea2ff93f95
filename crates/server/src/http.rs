//! HTTP Endpoints
//!
//! REST API for the voice relay.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use voice_relay_core::{ChatRequest, ResponseEnvelope};

use crate::auth;
use crate::error::ApiError;
use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins);

    let mut router = Router::new()
        .route("/chat", post(chat))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler));

    if state.history_enabled() {
        router = router
            .route("/register", post(auth::register))
            .route("/login", post(auth::login))
            .route("/history", get(auth::history));
    }

    // Each stage of /chat carries its own timeout inside the orchestrator
    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Any origin when none are configured, else only the listed ones
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::warn!("No valid CORS origins configured, allowing any origin");
        return CorsLayer::permissive();
    }

    tracing::info!(count = parsed.len(), "CORS restricted to configured origins");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Chat endpoint
///
/// A valid bearer token attaches the turn to that user's history; a
/// missing or unknown token makes the request anonymous.
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let user = auth::resolve_user(&state, &headers);

    let envelope = state.orchestrator.handle(request, user.as_ref()).await?;
    Ok(Json(envelope))
}

/// Liveness probe
async fn ping() -> &'static str {
    "OK"
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.orchestrator.config();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.orchestrator.model_name(),
        "local_language": config.local.code(),
        "pivot_language": config.pivot.code(),
        "history_enabled": state.history_enabled(),
    }))
}
