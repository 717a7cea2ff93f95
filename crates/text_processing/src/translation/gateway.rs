//! Fail-soft translation gateway
//!
//! The orchestrator never sees a translation error. The gateway returns the
//! input unchanged when the languages match, when the input is blank, and
//! when the provider fails or times out.

use std::sync::Arc;
use std::time::Duration;

use voice_relay_core::{Language, Translator};

/// Result of one gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    /// The provider failed and `text` is the untranslated input
    pub degraded: bool,
}

#[derive(Clone)]
pub struct TranslationGateway {
    translator: Arc<dyn Translator>,
    timeout: Duration,
}

impl TranslationGateway {
    pub fn new(translator: Arc<dyn Translator>, timeout: Duration) -> Self {
        Self { translator, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.translator.name()
    }

    /// Translate, falling back to the input on any failure
    pub async fn translate(&self, text: &str, from: Language, to: Language) -> String {
        self.translate_detailed(text, from, to).await.text
    }

    pub async fn translate_detailed(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> TranslationOutcome {
        if from == to || text.trim().is_empty() {
            return TranslationOutcome {
                text: text.to_string(),
                degraded: false,
            };
        }

        let call = self.translator.translate(text, from, to);
        let error = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(translated)) if !translated.trim().is_empty() => {
                return TranslationOutcome {
                    text: translated,
                    degraded: false,
                };
            }
            Ok(Ok(_)) => "provider returned empty text".to_string(),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };

        tracing::warn!(
            provider = self.translator.name(),
            from = %from,
            to = %to,
            error = %error,
            "Translation degraded, using untranslated text"
        );

        TranslationOutcome {
            text: text.to_string(),
            degraded: true,
        }
    }
}
