//! In-memory blacklist repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use tokengate_core::result::AppResult;
use tokengate_entity::token::{BlacklistedToken, CreateBlacklistedToken};

use crate::repositories::BlacklistRepository;

/// Revoked access tokens keyed by token digest.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlacklistRepository {
    entries: Arc<DashMap<String, BlacklistedToken>>,
}

impl MemoryBlacklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl BlacklistRepository for MemoryBlacklistRepository {
    async fn insert(&self, data: &CreateBlacklistedToken) -> AppResult<bool> {
        match self.entries.entry(data.token_hash.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(data.clone().into_record(Uuid::new_v4()));
                Ok(true)
            }
        }
    }

    async fn exists(&self, token_hash: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(token_hash))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_prunable_at(now));
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(hash: &str, expires_at: DateTime<Utc>) -> CreateBlacklistedToken {
        CreateBlacklistedToken {
            token_hash: hash.to_string(),
            username: "alice".to_string(),
            blacklisted_at: Utc::now(),
            expires_at,
            reason: Some("logout".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let repo = MemoryBlacklistRepository::new();
        let expires = Utc::now() + Duration::hours(1);
        assert!(repo.insert(&entry("h", expires)).await.unwrap());
        assert!(!repo.insert(&entry("h", expires)).await.unwrap());
        assert!(repo.exists("h").await.unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_prune_keeps_live_entries() {
        let repo = MemoryBlacklistRepository::new();
        let now = Utc::now();
        repo.insert(&entry("old", now)).await.unwrap();
        repo.insert(&entry("live", now + Duration::minutes(5)))
            .await
            .unwrap();

        assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
        assert!(!repo.exists("old").await.unwrap());
        assert!(repo.exists("live").await.unwrap());
    }
}
