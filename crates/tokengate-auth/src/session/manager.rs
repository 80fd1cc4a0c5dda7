//! Session lifecycle manager: login, refresh, and logout flows.

use std::sync::Arc;

use tracing::{info, warn};

use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;
use tokengate_core::types::PrincipalType;

use crate::credential::CredentialStore;
use crate::jwt::{Authenticated, TokenIssuer, TokenPair};
use crate::token::{RefreshTokenStore, TokenBlacklist};

/// What a logout removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Whether the access token was newly blacklisted.
    pub access_token_blacklisted: bool,
    /// Refresh tokens deleted.
    pub refresh_tokens_revoked: u64,
}

/// Ties credential checks, issuance, rotation, and revocation together for
/// the HTTP handlers.
#[derive(Debug, Clone)]
pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
    refresh_tokens: RefreshTokenStore,
    blacklist: TokenBlacklist,
}

impl SessionManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        issuer: TokenIssuer,
        refresh_tokens: RefreshTokenStore,
        blacklist: TokenBlacklist,
    ) -> Self {
        Self {
            credentials,
            issuer,
            refresh_tokens,
            blacklist,
        }
    }

    /// Authenticates against the credential store and issues a stored pair.
    ///
    /// Unknown accounts and wrong passwords produce the same error.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        principal_type: PrincipalType,
    ) -> AppResult<TokenPair> {
        let Some(principal) = self
            .credentials
            .authenticate(username, password, principal_type)
            .await?
        else {
            warn!(username, principal_type = %principal_type, "Login failed");
            return Err(login_failed(principal_type));
        };

        let pair = self.refresh_tokens.issue_for_login(&principal).await?;
        info!(
            username = %principal.username,
            principal_type = %principal_type,
            "Login succeeded"
        );
        Ok(pair)
    }

    /// Rotates a refresh token presented to the `principal_type` endpoint.
    ///
    /// The token must be a refresh token signed by that scheme before the
    /// store is consulted.
    pub async fn refresh(&self, refresh_token: &str, principal_type: PrincipalType) -> AppResult<TokenPair> {
        self.issuer
            .verify_refresh_token(refresh_token, principal_type)
            .map_err(|e| {
                warn!(principal_type = %principal_type, "Rejected refresh token");
                AppError::unauthorized(e.to_string()).with_code("INVALID_TOKEN")
            })?;

        Ok(self.refresh_tokens.rotate(refresh_token).await?)
    }

    /// Blacklists the presented access token and deletes refresh tokens.
    ///
    /// With a refresh token, only that one is deleted; without one, every
    /// refresh token of the principal is.
    pub async fn logout(
        &self,
        authenticated: &Authenticated,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<LogoutOutcome> {
        let principal = &authenticated.principal;
        let access_token_blacklisted = self
            .blacklist
            .revoke_token(
                access_token,
                &principal.username,
                authenticated.expires_at,
                Some("logout"),
            )
            .await?;

        let refresh_tokens_revoked = match refresh_token {
            Some(token) => u64::from(self.refresh_tokens.revoke(token).await?),
            None => {
                self.refresh_tokens
                    .revoke_all_for_user(&principal.username, principal.principal_type)
                    .await?
            }
        };

        info!(
            username = %principal.username,
            principal_type = %principal.principal_type,
            refresh_tokens_revoked,
            "Logged out"
        );
        Ok(LogoutOutcome {
            access_token_blacklisted,
            refresh_tokens_revoked,
        })
    }
}

fn login_failed(principal_type: PrincipalType) -> AppError {
    let message = match principal_type {
        PrincipalType::Subscriber => "Invalid mobile number or PIN",
        _ => "Incorrect username or password",
    };
    AppError::unauthorized(message).with_code("AUTHENTICATION_FAILED")
}
