//! Ordered multi-secret token validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use tokengate_core::result::AppResult;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

use super::claims;
use super::codec::{CodecError, TokenCodec};
use super::keys::SchemeRegistry;
use super::normalizer::ClaimNormalizer;
use crate::token::TokenBlacklist;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unparseable, or a required claim is missing.
    Malformed,
    /// Signed by a configured scheme but past `exp`.
    Expired,
    /// Revoked before expiry.
    Blacklisted,
    /// A refresh token was presented where an access token is required.
    RefreshTokenPresented,
    /// No configured scheme both verified and recognized the token.
    NoMatch,
}

impl AuthFailure {
    /// Machine-readable reason code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED_TOKEN",
            Self::Expired => "EXPIRED",
            Self::Blacklisted => "BLACKLISTED",
            Self::RefreshTokenPresented => "REFRESH_TOKEN_PRESENTED",
            Self::NoMatch => "NO_MATCH",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// Normalized identity.
    pub principal: CanonicalPrincipal,
    /// The token's `exp`.
    pub expires_at: DateTime<Utc>,
}

/// Outcome of validating one bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Valid(Authenticated),
    Invalid(AuthFailure),
}

impl AuthResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The principal, when valid.
    pub fn principal(&self) -> Option<&CanonicalPrincipal> {
        match self {
            Self::Valid(auth) => Some(&auth.principal),
            Self::Invalid(_) => None,
        }
    }

    /// The failure reason, when invalid.
    pub fn reason(&self) -> Option<AuthFailure> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }
}

/// Tries each configured scheme in order until one verifies and recognizes
/// the token.
///
/// Per scheme:
/// 1. Verify signature then expiry. A signature mismatch moves on to the
///    next scheme; expired or malformed ends validation.
/// 2. Reject refresh tokens.
/// 3. Reject blacklisted tokens.
/// 4. Normalize claims. An unrecognized shape moves on to the next scheme.
///
/// Only a blacklist store failure is returned as `Err`.
#[derive(Debug, Clone)]
pub struct MultiSchemeValidator {
    registry: Arc<SchemeRegistry>,
    codec: TokenCodec,
    blacklist: TokenBlacklist,
}

impl MultiSchemeValidator {
    pub fn new(registry: Arc<SchemeRegistry>, codec: TokenCodec, blacklist: TokenBlacklist) -> Self {
        Self {
            registry,
            codec,
            blacklist,
        }
    }

    /// Validates a bearer token string.
    pub async fn validate(&self, token: &str) -> AppResult<AuthResult> {
        for scheme in self.registry.iter() {
            let scheme_type = scheme.principal_type();

            let raw = match self.codec.verify(token, scheme.decoding_key()) {
                Ok(raw) => raw,
                Err(CodecError::SignatureMismatch) => continue,
                Err(CodecError::Expired) => {
                    return Ok(self.reject(scheme_type, AuthFailure::Expired));
                }
                Err(CodecError::Malformed) => {
                    return Ok(self.reject(scheme_type, AuthFailure::Malformed));
                }
            };

            if claims::is_refresh_token(&raw) {
                return Ok(self.reject(scheme_type, AuthFailure::RefreshTokenPresented));
            }

            if self.blacklist.contains_token(token).await? {
                return Ok(self.reject(scheme_type, AuthFailure::Blacklisted));
            }

            match ClaimNormalizer::normalize(&raw, scheme_type) {
                Ok(principal) => {
                    debug!(
                        scheme = %scheme_type,
                        username = %principal.username,
                        "Token accepted"
                    );
                    let expires_at = claims::expires_at(&raw).unwrap_or_else(|| self.codec.now());
                    return Ok(AuthResult::Valid(Authenticated {
                        principal,
                        expires_at,
                    }));
                }
                Err(unrecognized) => {
                    debug!(
                        scheme = %scheme_type,
                        reason = unrecognized.as_code(),
                        "Verified token has no recognized shape, trying next scheme"
                    );
                }
            }
        }

        debug!(reason = AuthFailure::NoMatch.as_code(), "Token rejected");
        Ok(AuthResult::Invalid(AuthFailure::NoMatch))
    }

    fn reject(&self, scheme: PrincipalType, reason: AuthFailure) -> AuthResult {
        debug!(scheme = %scheme, reason = reason.as_code(), "Token rejected");
        AuthResult::Invalid(reason)
    }
}
