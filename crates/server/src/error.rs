//! HTTP error mapping
//!
//! Every error body is `{"error": "<message>"}`. Upstream provider text
//! stays in the logs and never reaches a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use voice_relay_persistence::PersistenceError;
use voice_relay_pipeline::PipelineError;

pub const INFERENCE_UNAVAILABLE: &str = "The assistant is temporarily unavailable";
const INTERNAL: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    Persistence(PersistenceError),
    BadRequest(String),
    Unauthorized,
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::InferenceFailure(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Pipeline(PipelineError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(PipelineError::Configuration(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Persistence(PersistenceError::DuplicateUser(_))
            | ApiError::Persistence(PersistenceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(PersistenceError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            ApiError::Persistence(PersistenceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Persistence(PersistenceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show the caller
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Pipeline(PipelineError::InferenceFailure(_)) => INFERENCE_UNAVAILABLE.to_string(),
            ApiError::Pipeline(PipelineError::Validation(msg)) => msg.clone(),
            ApiError::Pipeline(PipelineError::Configuration(_)) => INTERNAL.to_string(),
            ApiError::Persistence(PersistenceError::DuplicateUser(_)) => {
                "Email already registered".to_string()
            }
            ApiError::Persistence(PersistenceError::InvalidInput(msg)) => msg.clone(),
            ApiError::Persistence(PersistenceError::InvalidCredentials) => {
                "Invalid email or password".to_string()
            }
            ApiError::Persistence(PersistenceError::NotFound(_)) | ApiError::NotFound => {
                "Not found".to_string()
            }
            ApiError::Persistence(PersistenceError::Storage(_)) => INTERNAL.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized => "Missing or invalid bearer token".to_string(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        ApiError::Persistence(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = ?self, "Request rejected");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
