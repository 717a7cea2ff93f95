//! Conversation pipeline
//!
//! Sequences language detection, translation, sentiment scoring, inference,
//! escalation and speech synthesis for a single chat turn.

pub mod escalation;
pub mod metrics;
pub mod orchestrator;
pub mod tts;

pub use escalation::EscalationPolicy;
pub use orchestrator::{ConversationOrchestrator, OrchestratorBuilder, OrchestratorConfig};
pub use tts::{create_synthesizer, DisabledSynthesizer, GoogleTtsConfig, GoogleTtsSynthesizer};

use thiserror::Error;

/// Errors that end a chat turn
///
/// Translation, sentiment and synthesis failures never show up here; they
/// degrade inside the orchestrator.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("Inference failed: {0}")]
    InferenceFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    /// Whether the caller sent something unacceptable
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

impl From<voice_relay_core::Error> for PipelineError {
    fn from(err: voice_relay_core::Error) -> Self {
        match err {
            voice_relay_core::Error::InvalidInput(msg) => PipelineError::Validation(msg),
            voice_relay_core::Error::Configuration(msg) => PipelineError::Configuration(msg),
            other => PipelineError::InferenceFailure(other.to_string()),
        }
    }
}
