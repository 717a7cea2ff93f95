//! Chat history store

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use voice_relay_core::{ChatRecord, UserId};

use crate::PersistenceError;

/// Append-only history of chat turns per user
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record; records without a user are rejected
    async fn append(&self, record: ChatRecord) -> Result<(), PersistenceError>;

    /// Most recent `limit` records for `user_id`, oldest first
    async fn list(&self, user_id: &UserId, limit: usize) -> Result<Vec<ChatRecord>, PersistenceError>;
}

/// In-memory history store
///
/// Each user's records live in their own vector; appends take the write
/// lock only long enough to push.
pub struct InMemoryHistoryStore {
    records: RwLock<HashMap<UserId, Vec<ChatRecord>>>,
    max_records_per_user: usize,
}

impl InMemoryHistoryStore {
    pub fn new(max_records_per_user: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            max_records_per_user: max_records_per_user.max(1),
        }
    }

    pub fn user_count(&self) -> usize {
        self.records.read().len()
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new(500)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: ChatRecord) -> Result<(), PersistenceError> {
        let user_id = record
            .user_id
            .clone()
            .ok_or_else(|| PersistenceError::InvalidInput("record has no user".to_string()))?;

        let mut records = self.records.write();
        let entries = records.entry(user_id).or_default();
        entries.push(record);
        if entries.len() > self.max_records_per_user {
            let overflow = entries.len() - self.max_records_per_user;
            entries.drain(..overflow);
        }
        Ok(())
    }

    async fn list(&self, user_id: &UserId, limit: usize) -> Result<Vec<ChatRecord>, PersistenceError> {
        let records = self.records.read();
        Ok(records
            .get(user_id)
            .map(|entries| {
                let start = entries.len().saturating_sub(limit);
                entries[start..].to_vec()
            })
            .unwrap_or_default())
    }
}
