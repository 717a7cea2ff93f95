//! Persistence errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl PersistenceError {
    /// Errors caused by the caller rather than the store
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PersistenceError::Storage(_))
    }
}

impl From<PersistenceError> for voice_relay_core::Error {
    fn from(err: PersistenceError) -> Self {
        voice_relay_core::Error::Storage(err.to_string())
    }
}
