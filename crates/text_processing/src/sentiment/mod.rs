//! Sentiment scoring
//!
//! Adapts the `vader_sentiment` analyzer to the [`SentimentScorer`] trait.
//! Input is pivot-language (English) text.
//!
//! This drives the escalation heuristic only. It is not a clinical
//! instrument; false positives and negatives are expected.

use async_trait::async_trait;
use vader_sentiment::SentimentIntensityAnalyzer;
use voice_relay_core::{Result, SentimentScore, SentimentScorer};

/// VADER polarity scores behind the scorer trait
pub struct VaderSentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score `text` synchronously
    pub fn analyze(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return SentimentScore::neutral();
        }

        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        SentimentScore::new(get("compound"), get("pos"), get("neg"), get("neu"))
    }
}

impl Default for VaderSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VaderSentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaderSentimentAnalyzer").finish()
    }
}

#[async_trait]
impl SentimentScorer for VaderSentimentAnalyzer {
    async fn score(&self, text: &str) -> Result<SentimentScore> {
        Ok(self.analyze(text))
    }

    fn name(&self) -> &str {
        "vader"
    }
}
