//! Text processing for the voice relay
//!
//! This crate provides:
//! - **Sanitizer**: strips characters a speech engine should not vocalize
//! - **Language detection**: script-range heuristic over local/pivot languages
//! - **Translation**: LibreTranslate and Google web providers behind the core
//!   `Translator` trait, plus a fail-soft gateway
//! - **Sentiment**: VADER scorer producing compound polarity
//!
//! # Example
//!
//! ```ignore
//! use voice_relay_text_processing::{sanitize_for_speech, TranslationGateway};
//!
//! let gateway = TranslationGateway::new(create_translator(&settings.translation)?, timeout);
//! let english = gateway.translate("আমি খুব খুশি", Language::Bengali, Language::English).await;
//! let spoken = sanitize_for_speech("**Great** news (really)!");
//! ```

pub mod sanitizer;
pub mod sentiment;
pub mod translation;

mod error;

pub use error::{Result, TextProcessingError};

pub use sanitizer::sanitize_for_speech;
pub use sentiment::VaderSentimentAnalyzer;
pub use translation::{
    create_translator, Detection, FallbackTranslator, GoogleWebTranslator, LibreTranslator,
    LibreTranslatorConfig, NoopTranslator, ScriptDetector, TranslationGateway, TranslationOutcome,
};
