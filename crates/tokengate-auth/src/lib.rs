//! # tokengate-auth
//!
//! The multi-scheme bearer token lifecycle for TokenGate.
//!
//! ## Modules
//!
//! - `jwt`: HS512 codec, claim normalization, ordered multi-secret validation, issuance
//! - `token`: refresh token rotation and the access token blacklist
//! - `credential`: account lookup and Argon2 password verification
//! - `session`: login, refresh, and logout flows
//!
//! [`AuthServices::build`] wires all of them from configuration.

pub mod credential;
pub mod jwt;
pub mod services;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use credential::{ConfigCredentialStore, CredentialStore};
pub use jwt::{
    AuthFailure, AuthResult, Authenticated, ClaimNormalizer, MultiSchemeValidator, TokenCodec,
    TokenIssuer, TokenPair,
};
pub use services::AuthServices;
pub use session::SessionManager;
pub use token::{RefreshTokenStore, RotationError, TokenBlacklist};
