//! Google Translate text-to-speech
//!
//! The `translate_tts` endpoint accepts short fragments only, so text is cut
//! into chunks at word boundaries and the returned MP3 segments are
//! concatenated. MP3 frames are self-delimiting, which makes the
//! concatenation a playable stream.

use async_trait::async_trait;
use std::time::Duration;

use voice_relay_config::SpeechConfig;
use voice_relay_core::{AudioArtifact, Error, Language, Result, SpeechSynthesizer};

use crate::PipelineError;

/// Longest fragment the endpoint accepts
pub const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    /// Base URL, without the `/translate_tts` path
    pub endpoint: String,
    /// Timeout for each fragment request
    pub timeout: Duration,
    pub slow: bool,
}

impl GoogleTtsConfig {
    pub fn from_settings(config: &SpeechConfig) -> Self {
        Self {
            endpoint: config.endpoint(),
            timeout: Duration::from_millis(config.timeout_ms),
            slow: config.slow,
        }
    }
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self::from_settings(&SpeechConfig::default())
    }
}

pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    config: GoogleTtsConfig,
}

impl GoogleTtsSynthesizer {
    pub fn new(config: GoogleTtsConfig) -> std::result::Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn tts_url(&self) -> String {
        format!("{}/translate_tts", self.config.endpoint.trim_end_matches('/'))
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        voice: Language,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let speed = if self.config.slow { "0.24" } else { "1" };
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(self.tts_url())
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", voice.code()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Synthesis(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Synthesis(format!("failed to read audio: {}", e)))?;
        if bytes.is_empty() {
            return Err(Error::Synthesis("empty audio segment".to_string()));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, text: &str, voice: Language) -> Result<AudioArtifact> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(Error::Synthesis("nothing to synthesize".to_string()));
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let segment = self.fetch_chunk(chunk, voice, idx, total).await?;
            audio.extend_from_slice(&segment);
        }

        tracing::debug!(
            voice = %voice,
            chunks = total,
            bytes = audio.len(),
            "Synthesized speech"
        );
        Ok(AudioArtifact::mp3(audio))
    }

    fn name(&self) -> &str {
        "google-tts"
    }
}

/// Split `text` into pieces of at most `max_chars` characters
///
/// Breaks at whitespace where possible; a single word longer than the
/// limit is split mid-word.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
