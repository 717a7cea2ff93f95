//! Speech synthesis backends

mod google;

pub use google::{chunk_text, GoogleTtsConfig, GoogleTtsSynthesizer, MAX_CHUNK_CHARS};

use async_trait::async_trait;
use std::sync::Arc;

use voice_relay_config::{SpeechConfig, SpeechProvider};
use voice_relay_core::{AudioArtifact, Error, Language, Result, SpeechSynthesizer};

use crate::PipelineError;

/// Synthesizer used when speech is switched off
///
/// Always fails, so every reply goes out with `audio: null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSynthesizer;

#[async_trait]
impl SpeechSynthesizer for DisabledSynthesizer {
    async fn synthesize(&self, _text: &str, _voice: Language) -> Result<AudioArtifact> {
        Err(Error::Synthesis("speech synthesis is disabled".to_string()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Build the configured synthesizer
pub fn create_synthesizer(
    config: &SpeechConfig,
) -> std::result::Result<Arc<dyn SpeechSynthesizer>, PipelineError> {
    let synthesizer: Arc<dyn SpeechSynthesizer> = match config.provider {
        SpeechProvider::Google => Arc::new(GoogleTtsSynthesizer::new(GoogleTtsConfig::from_settings(
            config,
        ))?),
        SpeechProvider::Disabled => Arc::new(DisabledSynthesizer),
    };
    tracing::info!(provider = synthesizer.name(), "Speech synthesizer ready");
    Ok(synthesizer)
}
