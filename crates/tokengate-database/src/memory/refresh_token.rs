//! In-memory refresh token repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;
use tokengate_core::types::PrincipalType;
use tokengate_entity::token::{CreateRefreshToken, RefreshToken};

use crate::repositories::RefreshTokenRepository;

/// Refresh tokens keyed by token digest.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenRepository {
    rows: Arc<DashMap<String, RefreshToken>>,
}

impl MemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn insert_new(&self, data: &CreateRefreshToken) -> AppResult<RefreshToken> {
        match self.rows.entry(data.token_value.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Refresh token already stored")),
            Entry::Vacant(slot) => {
                let record = data.clone().into_record(Uuid::new_v4());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn find_by_token_value(&self, token_value: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.rows.get(token_value).map(|r| r.value().clone()))
    }

    async fn create(&self, data: &CreateRefreshToken) -> AppResult<RefreshToken> {
        self.insert_new(data)
    }

    async fn replace(
        &self,
        old_token_value: &str,
        data: &CreateRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        if self.rows.contains_key(&data.token_value) {
            return Err(AppError::conflict("Refresh token already stored"));
        }
        // `remove` is the claim: only one caller gets the old row back.
        let Some((old_key, old_row)) = self.rows.remove(old_token_value) else {
            return Ok(None);
        };
        match self.insert_new(data) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                self.rows.insert(old_key, old_row);
                Err(e)
            }
        }
    }

    async fn delete_by_token_value(&self, token_value: &str) -> AppResult<bool> {
        Ok(self.rows.remove(token_value).is_some())
    }

    async fn delete_by_owner(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        let before = self.rows.len();
        self.rows
            .retain(|_, r| !(r.username == username && r.principal_type == principal_type));
        Ok(before.saturating_sub(self.rows.len()) as u64)
    }

    async fn count_by_owner(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.username == username && r.principal_type == principal_type)
            .count() as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        self.rows.retain(|_, r| {
            let keep = !r.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
