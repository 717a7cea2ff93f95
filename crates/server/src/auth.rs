//! Account routes and bearer-token resolution
//!
//! Mounted only when history is enabled. Tokens are opaque strings handed
//! out by `/login` and sent back as `Authorization: Bearer <token>`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use voice_relay_core::{ChatRecord, UserId};
use voice_relay_persistence::{PersistenceError, PersistenceLayer};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// User behind the request's bearer token, if any
pub fn resolve_user(state: &AppState, headers: &HeaderMap) -> Option<UserId> {
    let persistence = state.persistence.as_ref()?;
    persistence.tokens.resolve(bearer_token(headers)?)
}

fn persistence(state: &AppState) -> Result<&PersistenceLayer, ApiError> {
    state.persistence.as_ref().ok_or(ApiError::NotFound)
}

fn credentials(body: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, ApiError> {
    let Json(credentials) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".to_string()));
    }
    Ok(credentials)
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let persistence = persistence(&state)?;
    let credentials = credentials(body)?;

    let user_id = persistence
        .users
        .register(&credentials.email, &credentials.password)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let persistence = persistence(&state)?;
    let credentials = credentials(body)?;

    let user_id = persistence
        .users
        .verify(&credentials.email, &credentials.password)
        .await?
        .ok_or(PersistenceError::InvalidCredentials)?;

    let token = persistence.tokens.issue(&user_id);
    tracing::info!(user_id = %user_id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatRecord>>, ApiError> {
    let persistence = persistence(&state)?;
    let user_id = resolve_user(&state, &headers).ok_or(ApiError::Unauthorized)?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let records = persistence.history.list(&user_id, limit).await?;
    Ok(Json(records))
}
