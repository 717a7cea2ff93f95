//! LibreTranslate provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use voice_relay_core::{Language, Result, Translator};

use crate::TextProcessingError;

#[derive(Debug, Clone)]
pub struct LibreTranslatorConfig {
    /// Instance root, e.g. `https://libretranslate.com`
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Translator backed by a LibreTranslate instance
pub struct LibreTranslator {
    config: LibreTranslatorConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    error: Option<String>,
}

impl LibreTranslator {
    pub fn new(config: LibreTranslatorConfig) -> std::result::Result<Self, TextProcessingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TextProcessingError::Configuration(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn translate_url(&self) -> String {
        format!("{}/translate", self.config.endpoint.trim_end_matches('/'))
    }

    async fn request(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> std::result::Result<String, TextProcessingError> {
        let body = TranslateRequest {
            q: text,
            source: from.code(),
            target: to.code(),
            format: "text",
            api_key: self.config.api_key.as_deref(),
        };

        let response = self.client.post(self.translate_url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextProcessingError::ProviderStatus(status.as_u16()));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TextProcessingError::MalformedResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(TextProcessingError::TranslationFailed(error));
        }

        parsed
            .translated_text
            .ok_or_else(|| TextProcessingError::MalformedResponse("missing translatedText".into()))
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        Ok(self.request(text, from, to).await?)
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}
