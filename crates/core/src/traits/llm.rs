//! Inference trait

use crate::Result;
use async_trait::async_trait;

/// Single-turn chat completion against a hosted model
///
/// The system prompt carries persona and output-language directive. The
/// directive is advisory; final language is enforced by translation.
///
/// # Example
///
/// ```ignore
/// let client: Arc<dyn InferenceClient> = Arc::new(InferenceAdapter::new(backend));
/// let reply = client.complete(SYSTEM_PROMPT, "I feel great today").await?;
/// ```
#[async_trait]
pub trait InferenceClient: Send + Sync + 'static {
    /// Complete one turn
    ///
    /// # Errors
    /// Any failure (timeout, rate limit, malformed body) is returned as
    /// `Error::Inference` or `Error::Timeout`. There is no fallback reply.
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}
