//! Credential store seeded from `auth.accounts`.

use std::collections::HashMap;

use argon2::password_hash::{self, PasswordHash, PasswordVerifier};
use argon2::Argon2;
use async_trait::async_trait;
use tracing::warn;

use tokengate_core::config::AccountConfig;
use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

use super::CredentialStore;

#[derive(Debug, Clone)]
struct Account {
    password_hash: String,
    principal: CanonicalPrincipal,
}

/// Accounts held in memory with Argon2 PHC password hashes.
#[derive(Debug, Clone, Default)]
pub struct ConfigCredentialStore {
    accounts: HashMap<(PrincipalType, String), Account>,
}

impl ConfigCredentialStore {
    /// Builds the store, rejecting hashes that are not valid PHC strings.
    pub fn from_accounts(accounts: &[AccountConfig]) -> AppResult<Self> {
        let mut store = Self::default();
        for account in accounts {
            PasswordHash::new(&account.password_hash).map_err(|e| {
                AppError::configuration(format!(
                    "Invalid password hash for account '{}': {e}",
                    account.username
                ))
            })?;

            let mut principal =
                CanonicalPrincipal::new(account.principal_type, account.username.clone());
            principal.organization_id = account.organization_id;
            principal.subscriber_id = account.subscriber_id;
            principal.entity_id = account.entity_id.clone();

            store.accounts.insert(
                (account.principal_type, account.username.clone()),
                Account {
                    password_hash: account.password_hash.clone(),
                    principal,
                },
            );
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn lookup(&self, username: &str, principal_type: PrincipalType) -> Option<&Account> {
        self.accounts.get(&(principal_type, username.to_string()))
    }
}

/// Verifies a plaintext password against an Argon2 PHC string.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "Password verification failed: {e}"
        ))),
    }
}

#[async_trait]
impl CredentialStore for ConfigCredentialStore {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        principal_type: PrincipalType,
    ) -> AppResult<Option<CanonicalPrincipal>> {
        let Some(account) = self.lookup(username, principal_type) else {
            return Ok(None);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(Some(account.principal.clone()))
        } else {
            warn!(username, principal_type = %principal_type, "Password mismatch");
            Ok(None)
        }
    }

    async fn find_principal(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<Option<CanonicalPrincipal>> {
        Ok(self
            .lookup(username, principal_type)
            .map(|a| a.principal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString};

    fn hash(password: &str) -> String {
        let salt = SaltString::from_b64("dGVzdHNhbHR0ZXN0c2FsdA").unwrap();
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn account(username: &str, principal_type: PrincipalType) -> AccountConfig {
        AccountConfig {
            username: username.to_string(),
            password_hash: hash("correct horse"),
            principal_type,
            organization_id: Some(42),
            subscriber_id: None,
            entity_id: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store =
            ConfigCredentialStore::from_accounts(&[account("alice", PrincipalType::EntityAdmin)])
                .unwrap();

        let principal = store
            .authenticate("alice", "correct horse", PrincipalType::EntityAdmin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(principal.organization_id, Some(42));

        assert!(
            store
                .authenticate("alice", "wrong", PrincipalType::EntityAdmin)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .authenticate("alice", "correct horse", PrincipalType::SuperAdmin)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_principal() {
        let store =
            ConfigCredentialStore::from_accounts(&[account("alice", PrincipalType::EntityAdmin)])
                .unwrap();
        assert!(
            store
                .find_principal("alice", PrincipalType::EntityAdmin)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_principal("bob", PrincipalType::EntityAdmin)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_rejects_non_phc_hash() {
        let mut bad = account("alice", PrincipalType::EntityAdmin);
        bad.password_hash = "plaintext".to_string();
        assert!(ConfigCredentialStore::from_accounts(&[bad]).is_err());
    }
}
