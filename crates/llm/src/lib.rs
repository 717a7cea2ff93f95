//! LLM integration for the voice relay
//!
//! Features:
//! - OpenAI-compatible chat completion backend (Groq, OpenAI, local servers)
//! - Retry with exponential backoff for transient failures
//! - Adapter to the core `InferenceClient` capability

pub mod adapter;
pub mod backend;
pub mod prompt;

pub use adapter::InferenceAdapter;
pub use backend::{FinishReason, GenerationResult, LlmBackend, OpenAIBackend, OpenAIConfig};
pub use prompt::{Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Network(_) | LlmError::Timeout | LlmError::RateLimited
        )
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for voice_relay_core::Error {
    fn from(err: LlmError) -> Self {
        voice_relay_core::Error::Inference(err.to_string())
    }
}
