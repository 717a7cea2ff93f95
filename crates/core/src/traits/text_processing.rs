//! Text processing traits

use crate::{Language, Result, SentimentScore};
use async_trait::async_trait;

/// Translation between languages
///
/// Implementations:
/// - `LibreTranslator` - self-hosted or public LibreTranslate
/// - `GoogleWebTranslator` - Google's keyless web endpoint
/// - `NoopTranslator` - returns input unchanged
///
/// # Example
///
/// ```ignore
/// let translator: Arc<dyn Translator> = Arc::new(LibreTranslator::new(config)?);
/// let english = translator.translate("আমি খুব খুশি", Language::Bengali, Language::English).await?;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate `text` from `from` into `to`
    ///
    /// Implementations may return any error; callers that need fail-soft
    /// behaviour wrap the translator in a gateway.
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Sentiment scoring on pivot-language text
#[async_trait]
pub trait SentimentScorer: Send + Sync + 'static {
    async fn score(&self, text: &str) -> Result<SentimentScore>;

    /// Scorer name for logging
    fn name(&self) -> &str;
}
