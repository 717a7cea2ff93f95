//! Opaque bearer tokens

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use voice_relay_core::UserId;

#[derive(Debug, Clone)]
struct TokenEntry {
    user_id: UserId,
    issued_at: DateTime<Utc>,
}

/// Maps random tokens to the user they were issued for
#[derive(Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, TokenEntry>>,
    ttl: Option<Duration>,
}

impl TokenStore {
    /// Tokens that never expire
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Issue a fresh token for `user_id`
    pub fn issue(&self, user_id: &UserId) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.write().insert(
            token.clone(),
            TokenEntry {
                user_id: user_id.clone(),
                issued_at: Utc::now(),
            },
        );
        token
    }

    /// User for `token`; expired tokens are dropped and resolve to `None`
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        let entry = self.tokens.read().get(token).cloned()?;
        if let Some(ttl) = self.ttl {
            if Utc::now() - entry.issued_at > ttl {
                self.tokens.write().remove(token);
                tracing::debug!(user_id = %entry.user_id, "Dropped expired token");
                return None;
            }
        }
        Some(entry.user_id)
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}
