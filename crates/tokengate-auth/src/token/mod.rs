//! Server-side token state: refresh token rotation and the access token blacklist.

pub mod blacklist;
pub mod refresh;

use sha2::{Digest, Sha256};

pub use blacklist::TokenBlacklist;
pub use refresh::{RefreshTokenStore, RotationError};

/// SHA-256 hex digest of a token string. The form every store keys on.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// First 12 hex characters of a token's digest, for log correlation.
pub fn hash_prefix(token_hash: &str) -> &str {
    token_hash.get(..12).unwrap_or(token_hash)
}
