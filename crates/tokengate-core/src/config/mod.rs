//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod worker;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AccountConfig, AuthConfig, SchemeConfig};
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::logging::LoggingConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Minimum HMAC secret length in bytes for HS512 signing keys.
pub const MIN_SECRET_BYTES: usize = 32;

/// Upper bound for `auth.leeway_seconds`.
pub const MAX_LEEWAY_SECONDS: u64 = 300;

/// Upper bound for `auth.schemes[].access_ttl_minutes` (30 days).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 30 * 24 * 60;

/// Upper bound for `auth.schemes[].refresh_ttl_hours` (1 year).
pub const MAX_REFRESH_TTL_HOURS: u64 = 365 * 24;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration
/// (default.toml + environment overlay + `TOKENGATE__*` variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Signing schemes, TTLs and bootstrap accounts.
    pub auth: AuthConfig,
    /// Background sweep settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `TOKENGATE`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (used by tests and tooling).
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.schemes.is_empty() {
            return Err(AppError::configuration(
                "auth.schemes must list at least one signing scheme",
            ));
        }

        if self.auth.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.leeway_seconds must be at most {MAX_LEEWAY_SECONDS}"
            )));
        }

        let mut seen = HashSet::new();
        for scheme in &self.auth.schemes {
            if !seen.insert(scheme.principal_type) {
                return Err(AppError::configuration(format!(
                    "auth.schemes lists {} more than once",
                    scheme.principal_type
                )));
            }
            if scheme.secret.len() < MIN_SECRET_BYTES {
                return Err(AppError::configuration(format!(
                    "auth.schemes secret for {} must be at least {MIN_SECRET_BYTES} bytes",
                    scheme.principal_type
                )));
            }
            let access = scheme.access_ttl_minutes();
            let refresh = scheme.refresh_ttl_hours();
            if access == 0 || refresh == 0 {
                return Err(AppError::configuration(format!(
                    "auth.schemes TTLs for {} must be non-zero",
                    scheme.principal_type
                )));
            }
            if access > MAX_ACCESS_TTL_MINUTES || refresh > MAX_REFRESH_TTL_HOURS {
                return Err(AppError::configuration(format!(
                    "auth.schemes TTLs for {} exceed {MAX_ACCESS_TTL_MINUTES} minutes or {MAX_REFRESH_TTL_HOURS} hours",
                    scheme.principal_type
                )));
            }
        }

        for account in &self.auth.accounts {
            if !seen.contains(&account.principal_type) {
                return Err(AppError::configuration(format!(
                    "auth.accounts entry '{}' uses {} which has no signing scheme",
                    account.username, account.principal_type
                )));
            }
        }

        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }

        Ok(())
    }
}
