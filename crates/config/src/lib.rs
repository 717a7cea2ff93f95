//! Configuration management for the voice relay
//!
//! Supports loading configuration from:
//! - TOML/YAML files under `config/` (`default`, then `{env}`)
//! - Environment variables (`VOICE_RELAY__` prefix, `__` separator)
//! - Deployment shortcuts (`GROQ_API_KEY`, `PORT`, `EMERGENCY_CONTACT`)

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_file, DetectionMode, EscalationConfig, HistoryConfig,
    InferenceConfig, LanguageConfig, ObservabilityConfig, ReplyLanguage, RuntimeEnvironment,
    ServerConfig, Settings, SpeechConfig, SpeechProvider, TranslationConfig, TranslationProvider,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for voice_relay_core::Error {
    fn from(err: ConfigError) -> Self {
        voice_relay_core::Error::Configuration(err.to_string())
    }
}
