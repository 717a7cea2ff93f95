//! Google web translation provider
//!
//! Uses the keyless `translate_a/single?client=gtx` endpoint. The response is
//! a nested JSON array whose first element lists translated segments.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use voice_relay_core::{Language, Result, Translator};

use crate::TextProcessingError;

pub struct GoogleWebTranslator {
    endpoint: String,
    client: Client,
}

impl GoogleWebTranslator {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> std::result::Result<Self, TextProcessingError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TextProcessingError::Configuration(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> std::result::Result<String, TextProcessingError> {
        let url = format!("{}/translate_a/single", self.endpoint);
        let response = self
            .client
            .get(url)
            .query(&[
                ("client", "gtx"),
                ("sl", from.code()),
                ("tl", to.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextProcessingError::ProviderStatus(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TextProcessingError::MalformedResponse(e.to_string()))?;

        parse_segments(&body)
    }
}

/// Join the translated segments of a gtx response
fn parse_segments(body: &Value) -> std::result::Result<String, TextProcessingError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TextProcessingError::MalformedResponse("no segment list".into()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TextProcessingError::MalformedResponse("empty translation".into()));
    }
    Ok(text)
}

#[async_trait]
impl Translator for GoogleWebTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        Ok(self.request(text, from, to).await?)
    }

    fn name(&self) -> &str {
        "google-web"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_segments_joins_sentences() {
        let body = json!([
            [["I am very happy. ", "আমি খুব খুশি। ", null, null, 10],
             ["Thank you.", "ধন্যবাদ।", null, null, 10]],
            null,
            "bn"
        ]);
        assert_eq!(parse_segments(&body).unwrap(), "I am very happy. Thank you.");
    }

    #[test]
    fn test_parse_segments_rejects_garbage() {
        assert!(parse_segments(&json!({"error": "nope"})).is_err());
        assert!(parse_segments(&json!([[]])).is_err());
    }
}
