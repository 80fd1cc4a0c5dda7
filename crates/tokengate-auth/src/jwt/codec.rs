//! HS512 token signing and verification.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::Value;
use thiserror::Error;

use tokengate_core::error::AppError;
use tokengate_core::traits::Clock;

use super::claims::{self, RawClaims};

/// Why a token failed verification under one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Not a well-formed token, or a required claim is missing.
    #[error("malformed token")]
    Malformed,
    /// The token was not signed with this key.
    #[error("signature mismatch")]
    SignatureMismatch,
    /// The signature is valid but `exp` has passed.
    #[error("token expired")]
    Expired,
}

impl CodecError {
    /// Machine-readable code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED_TOKEN",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::Expired => "EXPIRED",
        }
    }
}

/// Signs and verifies tokens. Stateless apart from the clock.
///
/// Expiry is checked here against the injected [`Clock`] rather than by
/// `jsonwebtoken`, which would read the system time.
#[derive(Clone)]
pub struct TokenCodec {
    clock: Arc<dyn Clock>,
    leeway: Duration,
    header: Header,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("clock", &self.clock)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec tolerating `leeway` of clock skew past `exp`.
    pub fn new(clock: Arc<dyn Clock>, leeway: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from([claims::EXP.to_string()]);

        Self {
            clock,
            leeway,
            header: Header::new(Algorithm::HS512),
            validation,
        }
    }

    /// The codec's time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Tolerated clock skew past `exp`.
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Current time according to the codec's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Signs `claims`, stamping `iat` with the current time and `exp` with
    /// `iat + ttl`. Returns the token and its expiry.
    pub fn sign(
        &self,
        mut claims: RawClaims,
        key: &EncodingKey,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();
        let expires_at = now + ttl;
        claims.insert(claims::IAT.to_string(), Value::from(now.timestamp()));
        claims.insert(claims::EXP.to_string(), Value::from(expires_at.timestamp()));

        let token = encode(&self.header, &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;
        Ok((token, expires_at))
    }

    /// Verifies signature, then expiry.
    pub fn verify(&self, token: &str, key: &DecodingKey) -> Result<RawClaims, CodecError> {
        let claims = self.verify_signature(token, key)?;
        if self.is_expired(&claims) {
            return Err(CodecError::Expired);
        }
        Ok(claims)
    }

    /// Verifies the signature and claim structure without looking at `exp`.
    ///
    /// Used where expiry is decided by another source of truth, such as a
    /// stored refresh token row.
    pub fn verify_signature(&self, token: &str, key: &DecodingKey) -> Result<RawClaims, CodecError> {
        let data = decode::<RawClaims>(token, key, &self.validation).map_err(|e| match e.kind() {
            JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                CodecError::SignatureMismatch
            }
            _ => CodecError::Malformed,
        })?;

        if claims::expires_at(&data.claims).is_none() {
            return Err(CodecError::Malformed);
        }
        Ok(data.claims)
    }

    /// Whether `exp` (plus leeway) is at or before the current time. A
    /// payload without a usable `exp` counts as expired. With the default
    /// zero leeway any `exp` in the past is expired.
    pub fn is_expired(&self, claims: &RawClaims) -> bool {
        match claims::expires_at(claims) {
            Some(exp) => self.clock.now() >= exp + self.leeway,
            None => true,
        }
    }
}
