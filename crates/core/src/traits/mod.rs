//! Capability traits for the relay
//!
//! Every external ability the orchestrator depends on sits behind one of
//! these traits so that providers can be swapped from configuration and
//! replaced with mocks in tests.
//!
//! ```text
//! Text Processing:
//!   - Translator: text between local and pivot languages
//!   - SentimentScorer: polarity of the pivot-language prompt
//!
//! Language Models:
//!   - InferenceClient: single chat-completion turn
//!
//! Speech:
//!   - SpeechSynthesizer: sanitized text to encoded audio
//! ```

mod llm;
mod speech;
mod text_processing;

pub use llm::InferenceClient;
pub use speech::SpeechSynthesizer;
pub use text_processing::{SentimentScorer, Translator};
