//! Access and refresh token minting in each scheme's claim shape.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use tokengate_core::error::AppError;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

use super::claims::{self, RawClaims, subscriber, token_type};
use super::codec::TokenCodec;
use super::keys::SchemeRegistry;

/// A signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// An access token and the refresh token that can replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(access: IssuedToken, refresh: IssuedToken) -> Self {
        Self {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        }
    }
}

/// A presented refresh token was not a refresh token of the expected scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid {} refresh token", .0.display_name())]
pub struct InvalidRefreshToken(pub PrincipalType);

/// Identity carried by a verified refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSubject {
    pub username: String,
    pub principal_type: PrincipalType,
}

/// Mints tokens for a principal using its scheme's secret and TTLs.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    registry: Arc<SchemeRegistry>,
    codec: TokenCodec,
}

impl TokenIssuer {
    pub fn new(registry: Arc<SchemeRegistry>, codec: TokenCodec) -> Self {
        Self { registry, codec }
    }

    /// Short-lived access token in the principal's claim shape.
    pub fn issue_access_token(&self, principal: &CanonicalPrincipal) -> Result<IssuedToken, AppError> {
        let scheme = self.registry.require(principal.principal_type)?;
        let (token, expires_at) = self.codec.sign(
            access_claims(principal),
            scheme.encoding_key(),
            scheme.access_ttl(),
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Long-lived refresh token carrying the scheme's refresh marker.
    pub fn issue_refresh_token(
        &self,
        principal: &CanonicalPrincipal,
    ) -> Result<IssuedToken, AppError> {
        let scheme = self.registry.require(principal.principal_type)?;
        let (token, expires_at) = self.codec.sign(
            refresh_claims(principal),
            scheme.encoding_key(),
            scheme.refresh_ttl(),
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Issues both tokens.
    pub fn issue_pair(&self, principal: &CanonicalPrincipal) -> Result<TokenPair, AppError> {
        let access = self.issue_access_token(principal)?;
        let refresh = self.issue_refresh_token(principal)?;
        Ok(TokenPair::new(access, refresh))
    }

    /// Checks that `token` is a refresh token signed by the `expected`
    /// scheme. Expiry is not checked here; the stored row decides it.
    pub fn verify_refresh_token(
        &self,
        token: &str,
        expected: PrincipalType,
    ) -> Result<RefreshSubject, InvalidRefreshToken> {
        let invalid = InvalidRefreshToken(expected);
        let scheme = self.registry.get(expected).ok_or(invalid)?;
        let raw = self
            .codec
            .verify_signature(token, scheme.decoding_key())
            .map_err(|_| invalid)?;

        if !claims::is_refresh_token(&raw) {
            return Err(invalid);
        }
        if let Some(declared) = claims::str_claim(&raw, claims::PRINCIPAL_TYPE) {
            if declared != expected.as_str() {
                return Err(invalid);
            }
        }
        let username = claims::non_empty_str_claim(&raw, claims::SUB).ok_or(invalid)?;

        Ok(RefreshSubject {
            username: username.to_string(),
            principal_type: expected,
        })
    }
}

fn base_claims(principal: &CanonicalPrincipal) -> RawClaims {
    let mut payload = RawClaims::new();
    payload.insert(claims::SUB.into(), Value::from(principal.username.as_str()));
    payload.insert(claims::JTI.into(), Value::from(Uuid::new_v4().to_string()));
    payload
}

fn access_claims(principal: &CanonicalPrincipal) -> RawClaims {
    let mut payload = base_claims(principal);
    match principal.principal_type {
        PrincipalType::SuperAdmin => {
            payload.insert(claims::TOKEN_TYPE.into(), token_type::SUPER_ADMIN_ACCESS.into());
        }
        PrincipalType::EntityAdmin => {
            payload.insert(claims::TOKEN_TYPE.into(), token_type::ENTITY_ADMIN_ACCESS.into());
            if let Some(org) = principal.organization_id {
                payload.insert(claims::ORGANIZATION_ID.into(), org.into());
            }
        }
        PrincipalType::Subscriber => {
            payload.insert(claims::TYPE.into(), subscriber::ACCESS.into());
            payload.insert(claims::ROLE.into(), subscriber::ROLE.into());
            payload.insert(
                claims::MOBILE_NUMBER.into(),
                principal.username.as_str().into(),
            );
            if let Some(id) = principal.subscriber_id {
                payload.insert(claims::SUBSCRIBER_ID.into(), id.into());
            }
            if let Some(entity) = &principal.entity_id {
                payload.insert(claims::ENTITY_ID.into(), entity.as_str().into());
            }
            if let Some(org) = principal.organization_id {
                payload.insert(claims::ORGANIZATION_ID.into(), org.into());
            }
        }
    }
    payload
}

fn refresh_claims(principal: &CanonicalPrincipal) -> RawClaims {
    let mut payload = base_claims(principal);
    match principal.principal_type {
        PrincipalType::SuperAdmin => {
            payload.insert(claims::TOKEN_TYPE.into(), token_type::SUPER_ADMIN_REFRESH.into());
        }
        PrincipalType::EntityAdmin => {
            payload.insert(claims::TOKEN_TYPE.into(), token_type::ENTITY_ADMIN_REFRESH.into());
        }
        PrincipalType::Subscriber => {
            payload.insert(claims::TYPE.into(), subscriber::REFRESH.into());
            payload.insert(claims::ROLE.into(), subscriber::ROLE.into());
        }
    }
    payload.insert(claims::REFRESH.into(), Value::Bool(true));
    payload.insert(
        claims::PRINCIPAL_TYPE.into(),
        principal.principal_type.as_str().into(),
    );
    payload
}
