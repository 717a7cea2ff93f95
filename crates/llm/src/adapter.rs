//! Inference adapter
//!
//! Bridges the `LlmBackend` trait to the core `InferenceClient` capability,
//! so that the orchestrator only ever sees `voice_relay_core` types.

use std::sync::Arc;

use async_trait::async_trait;
use voice_relay_core::{InferenceClient, Result};

use crate::backend::{FinishReason, LlmBackend};
use crate::prompt::single_turn;

/// Adapter that wraps an `LlmBackend` to implement `InferenceClient`
///
/// # Example
///
/// ```ignore
/// let backend = OpenAIBackend::new(OpenAIConfig::groq(key, model))?;
/// let client: Arc<dyn InferenceClient> = Arc::new(InferenceAdapter::new(backend));
/// ```
pub struct InferenceAdapter {
    backend: Arc<dyn LlmBackend>,
    model_name: String,
}

impl InferenceAdapter {
    pub fn new<B: LlmBackend + 'static>(backend: B) -> Self {
        let model_name = backend.model_name().to_string();
        Self {
            backend: Arc::new(backend),
            model_name,
        }
    }
}

#[async_trait]
impl InferenceClient for InferenceAdapter {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let messages = single_turn(system_prompt, user_text);

        match self.backend.generate(&messages).await {
            Ok(result) => {
                if result.finish_reason == FinishReason::Length {
                    tracing::debug!(model = %self.model_name, "Reply truncated at max_tokens");
                }
                tracing::debug!(
                    model = %self.model_name,
                    tokens = result.tokens,
                    attempts = result.attempts,
                    latency_ms = result.total_time_ms,
                    "Inference completed"
                );
                Ok(result.text)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationResult;
    use crate::LlmError;
    use voice_relay_core::Error;
    use crate::prompt::{Message, Role};
    use std::sync::Mutex;

    struct RecordingBackend {
        seen: Arc<Mutex<Vec<Message>>>,
        reply: std::result::Result<String, fn() -> LlmError>,
    }

    #[async_trait]
    impl LlmBackend for RecordingBackend {
        async fn generate(&self, messages: &[Message]) -> std::result::Result<GenerationResult, LlmError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            match &self.reply {
                Ok(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 3,
                    total_time_ms: 1,
                    finish_reason: FinishReason::Stop,
                    attempts: 1,
                }),
                Err(make) => Err(make()),
            }
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_user() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let adapter = InferenceAdapter::new(RecordingBackend {
            seen: seen.clone(),
            reply: Ok("Hello there".to_string()),
        });

        let reply = adapter.complete("Be polite.", "hi").await.unwrap();
        assert_eq!(reply, "Hello there");
        assert_eq!(adapter.model_name(), "recording");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, Role::System);
        assert_eq!(seen[1].content, "hi");
    }

    #[tokio::test]
    async fn test_errors_become_inference_errors() {
        let adapter = InferenceAdapter::new(RecordingBackend {
            seen: Arc::default(),
            reply: Err(|| LlmError::Api("HTTP 401".to_string())),
        });
        let err = adapter.complete("", "hi").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));

        let adapter = InferenceAdapter::new(RecordingBackend {
            seen: Arc::default(),
            reply: Err(|| LlmError::Timeout),
        });
        let err = adapter.complete("", "hi").await.unwrap_err();
        assert!(matches!(err, Error::Inference(msg) if msg == "Timeout"));
    }
}
