//! Voice Relay Server
//!
//! Provides the HTTP surface for the relay: `/chat`, liveness and health
//! probes, Prometheus metrics and the optional account routes.

pub mod auth;
pub mod error;
pub mod http;
pub mod metrics;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use state::AppState;

use thiserror::Error;

/// Errors raised while assembling the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend initialization failed: {0}")]
    Backend(String),
}

impl From<voice_relay_config::ConfigError> for ServerError {
    fn from(err: voice_relay_config::ConfigError) -> Self {
        ServerError::Configuration(err.to_string())
    }
}

impl From<voice_relay_pipeline::PipelineError> for ServerError {
    fn from(err: voice_relay_pipeline::PipelineError) -> Self {
        ServerError::Backend(err.to_string())
    }
}

impl From<voice_relay_llm::LlmError> for ServerError {
    fn from(err: voice_relay_llm::LlmError) -> Self {
        ServerError::Backend(err.to_string())
    }
}

impl From<voice_relay_text_processing::TextProcessingError> for ServerError {
    fn from(err: voice_relay_text_processing::TextProcessingError) -> Self {
        ServerError::Backend(err.to_string())
    }
}
