//! User accounts
//!
//! Passwords are stored as `sha256(salt || password)` with a random
//! per-user salt. Emails are matched case-insensitively.

use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use voice_relay_core::UserId;

use crate::PersistenceError;

const MIN_PASSWORD_LEN: usize = 6;

/// Account registration and credential checks
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account, failing on a duplicate email
    async fn register(&self, email: &str, password: &str) -> Result<UserId, PersistenceError>;

    /// Resolve credentials to a user, `None` when they do not match
    async fn verify(&self, email: &str, password: &str) -> Result<Option<UserId>, PersistenceError>;
}

#[derive(Debug, Clone)]
struct UserRecord {
    id: UserId,
    salt: String,
    password_hash: String,
}

/// In-memory user store keyed by normalized email
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

fn normalize_email(email: &str) -> Result<String, PersistenceError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(PersistenceError::InvalidInput("email is not valid".to_string()));
    }
    Ok(email)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, email: &str, password: &str) -> Result<UserId, PersistenceError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PersistenceError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut users = self.users.write();
        if users.contains_key(&email) {
            return Err(PersistenceError::DuplicateUser(email));
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id: UserId::generate(),
            password_hash: hash_password(&salt, password),
            salt,
        };
        let id = record.id.clone();
        users.insert(email, record);

        tracing::info!(user_id = %id, "Registered user");
        Ok(id)
    }

    async fn verify(&self, email: &str, password: &str) -> Result<Option<UserId>, PersistenceError> {
        let Ok(email) = normalize_email(email) else {
            return Ok(None);
        };
        let users = self.users.read();
        Ok(users.get(&email).and_then(|record| {
            let candidate = hash_password(&record.salt, password);
            constant_time_eq(&candidate, &record.password_hash).then(|| record.id.clone())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_verify() {
        let store = InMemoryUserStore::new();
        let id = store.register("Asha@Example.com", "secret123").await.unwrap();

        assert_eq!(
            store.verify("asha@example.com", "secret123").await.unwrap(),
            Some(id)
        );
        assert_eq!(store.verify("asha@example.com", "wrong-pass").await.unwrap(), None);
        assert_eq!(store.verify("nobody@example.com", "secret123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        store.register("a@b.com", "secret123").await.unwrap();
        let err = store.register(" A@B.COM ", "another1").await.unwrap_err();
        assert!(matches!(err, PersistenceError::DuplicateUser(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let store = InMemoryUserStore::new();
        assert!(matches!(
            store.register("not-an-email", "secret123").await,
            Err(PersistenceError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("a@b.com", "short").await,
            Err(PersistenceError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_salted_hashes_differ() {
        assert_ne!(hash_password("s1", "pw"), hash_password("s2", "pw"));
        assert_eq!(hash_password("s1", "pw").len(), 64);
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
    }
}
