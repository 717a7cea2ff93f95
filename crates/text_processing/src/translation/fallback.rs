//! Primary/secondary translator chain

use std::sync::Arc;

use async_trait::async_trait;
use voice_relay_core::{Language, Result, Translator};

/// Tries `primary`, then `fallback` when the primary errors
pub struct FallbackTranslator {
    primary: Arc<dyn Translator>,
    fallback: Arc<dyn Translator>,
    name: String,
}

impl FallbackTranslator {
    pub fn new(primary: Arc<dyn Translator>, fallback: Arc<dyn Translator>) -> Self {
        let name = format!("{}+{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

#[async_trait]
impl Translator for FallbackTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        match self.primary.translate(text, from, to).await {
            Ok(translated) => Ok(translated),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Primary translator failed, trying fallback"
                );
                self.fallback.translate(text, from, to).await
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
