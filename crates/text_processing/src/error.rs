//! Text processing errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextProcessingError>;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Provider returned status {0}")]
    ProviderStatus(u16),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Sentiment analysis failed: {0}")]
    Sentiment(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TextProcessingError {
    fn from(err: reqwest::Error) -> Self {
        TextProcessingError::Network(err.to_string())
    }
}

impl From<TextProcessingError> for voice_relay_core::Error {
    fn from(err: TextProcessingError) -> Self {
        match err {
            TextProcessingError::Sentiment(msg) => voice_relay_core::Error::Sentiment(msg),
            TextProcessingError::Configuration(msg) => voice_relay_core::Error::Configuration(msg),
            other => voice_relay_core::Error::Translation(other.to_string()),
        }
    }
}
