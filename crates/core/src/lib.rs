//! Core traits and types for the voice relay
//!
//! This crate provides foundational types used across all other crates:
//! - Capability traits for pluggable backends (translation, sentiment, inference, speech)
//! - Language and script definitions
//! - Request/response envelope types
//! - Error types

pub mod audio;
pub mod conversation;
pub mod error;
pub mod language;
pub mod traits;

pub use audio::{AudioArtifact, AudioEncoding};
pub use conversation::{
    ChatRecord, ChatRequest, EscalationSignal, ResponseEnvelope, SentimentScore, UserId,
};
pub use error::{Error, Result};
pub use language::{Language, Script};

pub use traits::{InferenceClient, SentimentScorer, SpeechSynthesizer, Translator};
