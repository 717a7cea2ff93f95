//! Persistence layer for the voice relay
//!
//! Provides storage for:
//! - Chat history (prompt/response pairs per authenticated user)
//! - User accounts (salted SHA-256 password hashes)
//! - Opaque bearer tokens
//!
//! All stores are in-memory and safe for concurrent use.

pub mod error;
pub mod history;
pub mod tokens;
pub mod users;

pub use error::PersistenceError;
pub use history::{HistoryStore, InMemoryHistoryStore};
pub use tokens::TokenStore;
pub use users::{InMemoryUserStore, UserStore};

use std::sync::Arc;

/// Combined persistence layer with all stores
#[derive(Clone)]
pub struct PersistenceLayer {
    pub history: Arc<dyn HistoryStore>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenStore>,
}

impl PersistenceLayer {
    /// In-memory stores keeping at most `max_records_per_user` history rows
    pub fn in_memory(max_records_per_user: usize) -> Self {
        Self {
            history: Arc::new(InMemoryHistoryStore::new(max_records_per_user)),
            users: Arc::new(InMemoryUserStore::new()),
            tokens: Arc::new(TokenStore::new()),
        }
    }
}
