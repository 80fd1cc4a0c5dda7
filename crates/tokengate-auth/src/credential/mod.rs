//! Credential Store: verifies login secrets and resolves principal identity.

pub mod config_store;

use async_trait::async_trait;

use tokengate_core::result::AppResult;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

pub use config_store::ConfigCredentialStore;

/// Read-only account lookup used by login and rotation.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Verifies `password` for the account and returns its identity.
    ///
    /// `Ok(None)` means the username is unknown or the password is wrong.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        principal_type: PrincipalType,
    ) -> AppResult<Option<CanonicalPrincipal>>;

    /// Resolves the current identity of an account without a password.
    async fn find_principal(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<Option<CanonicalPrincipal>>;
}
