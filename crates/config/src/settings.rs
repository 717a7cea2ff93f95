//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use voice_relay_core::Language;

use crate::constants::{endpoints, escalation, history, inference, server, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, warnings only
    #[default]
    Development,
    Staging,
    /// All validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted chat-completion endpoint
    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    /// Local/pivot language pair and detection policy
    #[serde(default)]
    pub language: LanguageConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,

    /// Optional per-user history and the auth routes that feed it
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_inference()?;
        self.validate_server()?;
        self.validate_language()?;
        self.validate_escalation()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_inference(&self) -> Result<(), ConfigError> {
        if self.inference.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("inference.api_key".to_string()));
        }

        if self.inference.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("inference.endpoint".to_string()));
        }

        if !(0.0..=2.0).contains(&self.inference.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "inference.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.inference.temperature),
            });
        }

        if self.inference.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inference.max_tokens".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        for origin in &self.server.cors_origins {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "server.cors_origins".to_string(),
                    message: format!("Origin must start with http:// or https://, got {}", origin),
                });
            }
        }

        Ok(())
    }

    fn validate_language(&self) -> Result<(), ConfigError> {
        if self.language.local == self.language.pivot {
            return Err(ConfigError::InvalidValue {
                field: "language.local".to_string(),
                message: format!(
                    "Local and pivot languages must differ, both are {}",
                    self.language.local.name()
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.language.min_pivot_ratio) {
            return Err(ConfigError::InvalidValue {
                field: "language.min_pivot_ratio".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    self.language.min_pivot_ratio
                ),
            });
        }

        Ok(())
    }

    fn validate_escalation(&self) -> Result<(), ConfigError> {
        let esc = &self.escalation;

        if !(-1.0..=1.0).contains(&esc.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "escalation.threshold".to_string(),
                message: format!("Must be between -1.0 and 1.0, got {}", esc.threshold),
            });
        }

        if esc.emergency_contact.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "escalation.emergency_contact".to_string(),
                message: "Emergency contact cannot be empty".to_string(),
            });
        }

        if esc.emergency_contact == escalation::DEFAULT_EMERGENCY_CONTACT {
            if self.environment.is_production() {
                return Err(ConfigError::InvalidValue {
                    field: "escalation.emergency_contact".to_string(),
                    message: "Placeholder contact is not allowed in production".to_string(),
                });
            }
            tracing::warn!("escalation.emergency_contact is the placeholder value");
        }

        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), ConfigError> {
        let checks = [
            ("inference.timeout_ms", self.inference.timeout_ms),
            ("translation.timeout_ms", self.translation.timeout_ms),
            ("speech.timeout_ms", self.speech.timeout_ms),
            ("language.sentiment_timeout_ms", self.language.sentiment_timeout_ms),
        ];

        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Apply the deployment shortcuts on top of the layered settings
    ///
    /// `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.inference.api_key = key;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Environment(
                format!("PORT must be a port number, got {:?}", port),
            ))?;
        }

        if let Some(contact) = lookup("EMERGENCY_CONTACT").filter(|c| !c.trim().is_empty()) {
            self.escalation.emergency_contact = contact;
        }

        Ok(())
    }

    /// System prompt with the pivot language substituted in
    pub fn system_prompt(&self) -> String {
        self.inference
            .system_prompt
            .replace("{language}", self.language.pivot.name())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    server::DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// OpenAI-compatible chat completion settings
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_endpoint")]
    pub endpoint: String,

    /// Required; startup fails without it
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_inference_timeout")]
    pub timeout_ms: u64,

    /// Retries on network errors, 429 and 5xx
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Persona and output-language directive; `{language}` is substituted
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_inference_endpoint() -> String {
    endpoints::GROQ_DEFAULT.to_string()
}

fn default_model() -> String {
    inference::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    inference::DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    inference::DEFAULT_TEMPERATURE
}

fn default_inference_timeout() -> u64 {
    inference::DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    inference::DEFAULT_MAX_RETRIES
}

fn default_system_prompt() -> String {
    inference::DEFAULT_SYSTEM_PROMPT.to_string()
}

impl InferenceConfig {
    /// First five characters of the key followed by a mask
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(5).collect();
        format!("{}*****", prefix)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_inference_endpoint(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_inference_timeout(),
            max_retries: default_max_retries(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.masked_api_key())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Translation provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// LibreTranslate `/translate`
    #[default]
    Libre,
    /// Google web endpoint, no key
    Google,
    /// Pass text through unchanged
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Provider root URL; `None` uses the provider's public default
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Tried when the primary provider fails
    #[serde(default)]
    pub fallback_provider: Option<TranslationProvider>,

    #[serde(default = "default_translation_timeout")]
    pub timeout_ms: u64,
}

fn default_translation_timeout() -> u64 {
    timeouts::TRANSLATION_MS
}

impl TranslationConfig {
    /// Endpoint for `provider`, falling back to its public default
    pub fn endpoint_for(&self, provider: TranslationProvider) -> String {
        match (provider, &self.endpoint) {
            (p, Some(url)) if p == self.provider => url.trim_end_matches('/').to_string(),
            (TranslationProvider::Google, _) => endpoints::GOOGLE_TRANSLATE_DEFAULT.to_string(),
            _ => endpoints::LIBRE_TRANSLATE_DEFAULT.to_string(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: None,
            api_key: None,
            fallback_provider: Some(TranslationProvider::Google),
            timeout_ms: default_translation_timeout(),
        }
    }
}

/// Speech synthesis provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    #[default]
    Google,
    /// Every reply goes out with `audio: null`
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub provider: SpeechProvider,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_speech_timeout")]
    pub timeout_ms: u64,

    /// Slower speaking rate
    #[serde(default)]
    pub slow: bool,

    /// Google top-level domain used for regional accents
    #[serde(default = "default_tld")]
    pub tld: String,
}

fn default_speech_timeout() -> u64 {
    timeouts::SPEECH_MS
}

fn default_tld() -> String {
    "com".to_string()
}

impl SpeechConfig {
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.tld == "com" => endpoints::GOOGLE_TTS_DEFAULT.to_string(),
            None => format!("https://translate.google.{}", self.tld),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            endpoint: None,
            timeout_ms: default_speech_timeout(),
            slow: false,
            tld: default_tld(),
        }
    }
}

/// How the caller's language is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Count letters per Unicode script
    #[default]
    Script,
    /// Every undeclared prompt is treated as the local language
    AssumeLocal,
}

/// Which language replies are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplyLanguage {
    /// Same language the prompt was in
    #[default]
    Detected,
    /// Always the local language
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    #[serde(default = "default_local")]
    pub local: Language,

    #[serde(default = "default_pivot")]
    pub pivot: Language,

    #[serde(default)]
    pub detection: DetectionMode,

    #[serde(default)]
    pub reply: ReplyLanguage,

    /// Share of pivot-script letters required to call a prompt pivot
    #[serde(default = "default_min_pivot_ratio")]
    pub min_pivot_ratio: f32,

    #[serde(default = "default_sentiment_timeout")]
    pub sentiment_timeout_ms: u64,
}

fn default_local() -> Language {
    Language::Bengali
}

fn default_pivot() -> Language {
    Language::English
}

fn default_min_pivot_ratio() -> f32 {
    0.8
}

fn default_sentiment_timeout() -> u64 {
    timeouts::SENTIMENT_MS
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            local: default_local(),
            pivot: default_pivot(),
            detection: DetectionMode::default(),
            reply: ReplyLanguage::default(),
            min_pivot_ratio: default_min_pivot_ratio(),
            sentiment_timeout_ms: default_sentiment_timeout(),
        }
    }
}

/// Negative-sentiment escalation
///
/// The threshold is a heuristic with no clinical validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_emergency_contact")]
    pub emergency_contact: String,

    #[serde(default = "default_advisory")]
    pub advisory: String,

    /// Add the `sentiment` object to chat responses
    #[serde(default)]
    pub include_sentiment: bool,
}

fn default_threshold() -> f64 {
    escalation::DEFAULT_THRESHOLD
}

fn default_emergency_contact() -> String {
    escalation::DEFAULT_EMERGENCY_CONTACT.to_string()
}

fn default_advisory() -> String {
    escalation::DEFAULT_ADVISORY.to_string()
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            emergency_contact: default_emergency_contact(),
            advisory: default_advisory(),
            include_sentiment: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Enables `/register`, `/login` and `/history`
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_max_records")]
    pub max_records_per_user: usize,
}

fn default_max_records() -> usize {
    history::DEFAULT_MAX_RECORDS_PER_USER
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_records_per_user: default_max_records(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/`, environment variables and shortcuts
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOICE_RELAY")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    settings.apply_env_overrides(|key| std::env::var(key).ok())?;
    settings.validate()?;

    Ok(settings)
}

/// Load settings from a single explicit file
///
/// The format is picked from the extension (`toml`, `yaml`/`yml`, `json`).
/// Deployment shortcuts still apply on top.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let mut settings: Settings = match extension.as_str() {
        "toml" => toml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        "yaml" | "yml" => {
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        "json" => serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        other => {
            return Err(ConfigError::ParseError(format!(
                "Unsupported configuration format: {:?}",
                other
            )))
        }
    };

    settings.apply_env_overrides(|key| std::env::var(key).ok())?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.inference.api_key = "gsk_test_key".to_string();
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.escalation.threshold, -0.5);
        assert_eq!(settings.language.local, Language::Bengali);
        assert_eq!(settings.language.pivot, Language::English);
        assert_eq!(settings.inference.model, "llama-3.3-70b-versatile");
        assert!(settings.server.cors_origins.is_empty());
        assert!(!settings.history.enabled);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(field)) if field == "inference.api_key"
        ));
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        let mut settings = valid_settings();
        settings.escalation.threshold = -1.5;
        assert!(settings.validate().is_err());

        settings.escalation.threshold = -0.4;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 5000;
        settings.server.cors_origins = vec!["example.com".to_string()];
        assert!(settings.validate().is_err());

        settings.server.cors_origins = vec!["https://example.com".to_string()];
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_language_pair_must_differ() {
        let mut settings = valid_settings();
        settings.language.local = Language::English;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "language.local"
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = valid_settings();
        settings.speech.timeout_ms = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_placeholder_contact_rejected_in_production() {
        let mut settings = valid_settings();
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());

        settings.escalation.emergency_contact = "999".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GROQ_API_KEY", "gsk_from_env"),
            ("PORT", "8088"),
            ("EMERGENCY_CONTACT", "16263"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.inference.api_key, "gsk_from_env");
        assert_eq!(settings.server.port, 8088);
        assert_eq!(settings.escalation.emergency_contact, "16263");
    }

    #[test]
    fn test_bad_port_override() {
        let mut settings = Settings::default();
        let result = settings.apply_env_overrides(|k| (k == "PORT").then(|| "abc".to_string()));
        assert!(matches!(result, Err(ConfigError::Environment(_))));
    }

    #[test]
    fn test_api_key_is_masked_in_debug() {
        let settings = valid_settings();
        let debug = format!("{:?}", settings.inference);
        assert!(debug.contains("gsk_t*****"));
        assert!(!debug.contains("gsk_test_key"));
    }

    #[test]
    fn test_system_prompt_substitution() {
        let settings = valid_settings();
        assert!(settings.system_prompt().contains("ONLY in English"));
    }

    #[test]
    fn test_translation_endpoint_defaults() {
        let mut config = TranslationConfig::default();
        assert_eq!(
            config.endpoint_for(TranslationProvider::Libre),
            endpoints::LIBRE_TRANSLATE_DEFAULT
        );

        config.endpoint = Some("http://localhost:5000/".to_string());
        assert_eq!(
            config.endpoint_for(TranslationProvider::Libre),
            "http://localhost:5000"
        );
        assert_eq!(
            config.endpoint_for(TranslationProvider::Google),
            endpoints::GOOGLE_TRANSLATE_DEFAULT
        );
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[inference]
api_key = "gsk_file"

[language]
local = "hi"

[escalation]
threshold = -0.3
emergency_contact = "112"
"#
        )
        .unwrap();

        let settings = load_settings_file(file.path()).unwrap();
        assert_eq!(settings.language.local, Language::Hindi);
        assert_eq!(settings.escalation.threshold, -0.3);
        assert_eq!(settings.escalation.emergency_contact, "112");
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "inference:\n  api_key: gsk_yaml\ntranslation:\n  provider: google\nspeech:\n  provider: disabled\n"
        )
        .unwrap();

        let settings = load_settings_file(file.path()).unwrap();
        assert_eq!(settings.translation.provider, TranslationProvider::Google);
        assert_eq!(settings.speech.provider, SpeechProvider::Disabled);
    }

    #[test]
    fn test_missing_file() {
        let result = load_settings_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
