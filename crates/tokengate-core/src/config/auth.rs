//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::types::PrincipalType;

/// Signing schemes, clock leeway, and bootstrap accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Tolerated clock skew when checking `exp`, in seconds. Blacklist
    /// entries are kept for the same extra window.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Signing schemes in validation order. The first scheme whose secret
    /// verifies a token decides its principal type.
    #[serde(default)]
    pub schemes: Vec<SchemeConfig>,
    /// Accounts accepted by the configuration-backed credential store.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// One principal type's signing secret and token lifetimes.
#[derive(Clone, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Principal type this secret signs for.
    pub principal_type: PrincipalType,
    /// HMAC-SHA512 secret.
    pub secret: String,
    /// Access token TTL in minutes. Defaults per principal type.
    #[serde(default)]
    pub access_ttl_minutes: Option<u64>,
    /// Refresh token TTL in hours. Defaults per principal type.
    #[serde(default)]
    pub refresh_ttl_hours: Option<u64>,
}

impl SchemeConfig {
    /// Configured access TTL, or the principal type's default: 2h for
    /// super admins, 1h for entity admins, 24h for subscribers.
    pub fn access_ttl_minutes(&self) -> u64 {
        self.access_ttl_minutes
            .unwrap_or(match self.principal_type {
                PrincipalType::SuperAdmin => 2 * 60,
                PrincipalType::EntityAdmin => 60,
                PrincipalType::Subscriber => 24 * 60,
            })
    }

    /// Configured refresh TTL, or the principal type's default: 3 days for
    /// super admins, 7 days otherwise.
    pub fn refresh_ttl_hours(&self) -> u64 {
        self.refresh_ttl_hours
            .unwrap_or(match self.principal_type {
                PrincipalType::SuperAdmin => 3 * 24,
                PrincipalType::EntityAdmin | PrincipalType::Subscriber => 7 * 24,
            })
    }
}

impl std::fmt::Debug for SchemeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeConfig")
            .field("principal_type", &self.principal_type)
            .field("secret", &"[REDACTED]")
            .field("access_ttl_minutes", &self.access_ttl_minutes())
            .field("refresh_ttl_hours", &self.refresh_ttl_hours())
            .finish()
    }
}

/// A login account with an Argon2 PHC password hash.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login name. Mobile number for subscribers.
    pub username: String,
    /// Argon2 PHC string (`$argon2id$v=19$...`).
    pub password_hash: String,
    /// Principal type the account logs in as.
    pub principal_type: PrincipalType,
    /// Owning organization (entity admins and subscribers).
    #[serde(default)]
    pub organization_id: Option<i64>,
    /// Subscriber record id.
    #[serde(default)]
    pub subscriber_id: Option<i64>,
    /// Entity code the subscriber belongs to.
    #[serde(default)]
    pub entity_id: Option<String>,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("principal_type", &self.principal_type)
            .field("organization_id", &self.organization_id)
            .field("subscriber_id", &self.subscriber_id)
            .field("entity_id", &self.entity_id)
            .finish_non_exhaustive()
    }
}
