//! Pass-through translator

use async_trait::async_trait;
use voice_relay_core::{Language, Result, Translator};

/// Returns input unchanged; used when translation is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
