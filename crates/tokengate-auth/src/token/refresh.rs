//! Refresh token persistence and single-use rotation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;
use tokengate_core::traits::Clock;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};
use tokengate_database::RefreshTokenRepository;
use tokengate_entity::token::CreateRefreshToken;

use super::{hash_prefix, hash_token};
use crate::credential::CredentialStore;
use crate::jwt::{IssuedToken, TokenIssuer, TokenPair};

/// Why a rotation did not produce a new pair.
#[derive(Debug, Error)]
pub enum RotationError {
    /// No stored record for the token; never issued, already rotated, or revoked.
    #[error("Refresh token not found in database")]
    NotFound,
    /// The stored record has expired. It has been deleted.
    #[error("Refresh token expired")]
    Expired,
    /// The record's account no longer resolves to a principal of its type.
    #[error("Invalid {} refresh token", .0.display_name())]
    Invalid(PrincipalType),
    /// The backing store or issuer failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl RotationError {
    /// Machine-readable code for the response body.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::NotFound => "TOKEN_NOT_FOUND",
            Self::Expired => "TOKEN_EXPIRED",
            Self::Invalid(_) => "INVALID_TOKEN",
            Self::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<RotationError> for AppError {
    fn from(err: RotationError) -> Self {
        match err {
            RotationError::Store(inner) => inner,
            other => AppError::unauthorized(other.to_string()).with_code(other.as_code()),
        }
    }
}

/// Issues, rotates, and revokes stored refresh tokens.
///
/// Records are keyed by [`hash_token`] of the issued string.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    issuer: TokenIssuer,
    credentials: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenStore {
    pub fn new(
        repo: Arc<dyn RefreshTokenRepository>,
        issuer: TokenIssuer,
        credentials: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            issuer,
            credentials,
            clock,
        }
    }

    /// Issues a pair for a freshly authenticated principal and stores the
    /// refresh half.
    ///
    /// Super admins hold at most one refresh token: their earlier ones are
    /// deleted first.
    pub async fn issue_for_login(&self, principal: &CanonicalPrincipal) -> AppResult<TokenPair> {
        if principal.principal_type == PrincipalType::SuperAdmin {
            let removed = self
                .repo
                .delete_by_owner(&principal.username, principal.principal_type)
                .await?;
            if removed > 0 {
                info!(
                    username = %principal.username,
                    removed,
                    "Replaced existing super admin refresh tokens"
                );
            }
        }

        let refresh = self.issuer.issue_refresh_token(principal)?;
        self.repo
            .create(&self.record_for(principal, &refresh))
            .await?;
        let access = self.issuer.issue_access_token(principal)?;

        Ok(TokenPair::new(access, refresh))
    }

    /// Exchanges a stored refresh token for a new pair.
    ///
    /// 1. Look up the record. Missing is `NotFound`.
    /// 2. An expired record is deleted and reported as `Expired`.
    /// 3. Resolve the owner's current identity.
    /// 4. Atomically swap the old record for the new refresh token's record.
    ///    Losing a concurrent swap is `NotFound`.
    /// 5. Issue the access token.
    pub async fn rotate(&self, old_token: &str) -> Result<TokenPair, RotationError> {
        let old_hash = hash_token(old_token);

        let Some(record) = self.repo.find_by_token_value(&old_hash).await? else {
            warn!(token = hash_prefix(&old_hash), "Refresh token not found");
            return Err(RotationError::NotFound);
        };

        if record.is_expired_at(self.clock.now()) {
            self.repo.delete_by_token_value(&old_hash).await?;
            info!(
                username = %record.username,
                token = hash_prefix(&old_hash),
                "Expired refresh token removed"
            );
            return Err(RotationError::Expired);
        }

        let principal = self
            .credentials
            .find_principal(&record.username, record.principal_type)
            .await?
            .ok_or(RotationError::Invalid(record.principal_type))?;

        let refresh = self.issuer.issue_refresh_token(&principal)?;
        let swapped = self
            .repo
            .replace(&old_hash, &self.record_for(&principal, &refresh))
            .await?;
        if swapped.is_none() {
            warn!(
                username = %record.username,
                token = hash_prefix(&old_hash),
                "Refresh token consumed by a concurrent rotation"
            );
            return Err(RotationError::NotFound);
        }

        let access = self.issuer.issue_access_token(&principal)?;
        info!(
            username = %principal.username,
            principal_type = %principal.principal_type,
            "Refresh token rotated"
        );
        Ok(TokenPair::new(access, refresh))
    }

    /// Deletes the record for one refresh token. Returns `true` if it existed.
    pub async fn revoke(&self, token: &str) -> AppResult<bool> {
        self.repo.delete_by_token_value(&hash_token(token)).await
    }

    /// Deletes every refresh token owned by a subject.
    pub async fn revoke_all_for_user(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        let removed = self.repo.delete_by_owner(username, principal_type).await?;
        info!(username, principal_type = %principal_type, removed, "Refresh tokens revoked");
        Ok(removed)
    }

    /// Deletes expired records. Returns the count removed.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let removed = self.repo.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            info!(removed, "Purged expired refresh tokens");
        }
        Ok(removed)
    }

    /// Number of stored tokens owned by a subject.
    pub async fn count_for_user(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        self.repo.count_by_owner(username, principal_type).await
    }

    fn record_for(&self, principal: &CanonicalPrincipal, refresh: &IssuedToken) -> CreateRefreshToken {
        CreateRefreshToken {
            token_value: hash_token(&refresh.token),
            username: principal.username.clone(),
            principal_type: principal.principal_type,
            expires_at: refresh.expires_at,
            created_at: self.clock.now(),
        }
    }
}
