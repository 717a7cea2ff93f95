//! Request, response and record types for a single chat turn

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Language;

/// Inbound chat turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Raw user utterance. Missing in the body is treated as empty.
    #[serde(default)]
    pub prompt: String,
    /// Language declared by the caller; skips detection when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Trimmed prompt, `None` when nothing is left
    pub fn trimmed_prompt(&self) -> Option<&str> {
        let trimmed = self.prompt.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Polarity scores for a piece of text
///
/// `compound` lies in [-1, 1]; the three proportions lie in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScore {
    pub fn new(compound: f64, positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            compound: compound.clamp(-1.0, 1.0),
            positive: positive.clamp(0.0, 1.0),
            negative: negative.clamp(0.0, 1.0),
            neutral: neutral.clamp(0.0, 1.0),
        }
    }

    /// Score used when no polarity could be determined
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

impl Default for SentimentScore {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Out-of-band marker that the turn may need human follow-up
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EscalationSignal {
    pub triggered: bool,
    pub code: Option<String>,
}

impl EscalationSignal {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn triggered(code: impl Into<String>) -> Self {
        Self {
            triggered: true,
            code: Some(code.into()),
        }
    }
}

/// Body returned from `POST /chat`
///
/// `audio` and `call` always serialize, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub response: String,
    pub audio: Option<String>,
    pub call: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentScore>,
}

impl ResponseEnvelope {
    /// Envelope for a turn that had nothing to say
    pub fn empty() -> Self {
        Self {
            response: String::new(),
            audio: None,
            call: None,
            sentiment: None,
        }
    }
}

/// Opaque identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted prompt/response pair for one authenticated turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    #[serde(skip_serializing)]
    pub user_id: Option<UserId>,
    pub prompt: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    pub fn new(user_id: UserId, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            prompt: prompt.into(),
            response: response.into(),
            created_at: Utc::now(),
        }
    }
}
