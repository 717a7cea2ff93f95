//! Speech synthesis trait

use crate::{AudioArtifact, Language, Result};
use async_trait::async_trait;

/// Text-to-Speech interface
///
/// Implementations:
/// - `GoogleTtsSynthesizer` - Google translate_tts voices (MP3)
/// - `DisabledSynthesizer` - always fails, for deployments without audio
///
/// # Example
///
/// ```ignore
/// let tts: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleTtsSynthesizer::new(config)?);
/// let audio = tts.synthesize("আমি ভালো আছি", Language::Bengali).await?;
/// ```
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize already-sanitized text with a voice for `voice`
    async fn synthesize(&self, text: &str, voice: Language) -> Result<AudioArtifact>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
