//! Error types shared across the relay

use thiserror::Error;

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by capability implementations
///
/// Each variant names the stage that failed. The orchestrator decides which
/// of them are fatal (only `Inference`) and which degrade the reply.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("{stage} timed out after {after_ms}ms")]
    Timeout { stage: String, after_ms: u64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Build a timeout error for the named stage
    pub fn timeout(stage: impl Into<String>, after: std::time::Duration) -> Self {
        Self::Timeout {
            stage: stage.into(),
            after_ms: after.as_millis() as u64,
        }
    }
}
