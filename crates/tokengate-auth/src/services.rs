//! Wiring of the token lifecycle components.

use std::sync::Arc;

use chrono::Duration;

use tokengate_core::config::AuthConfig;
use tokengate_core::result::AppResult;
use tokengate_core::traits::Clock;
use tokengate_database::TokenStores;

use crate::credential::CredentialStore;
use crate::jwt::keys::config_duration;
use crate::jwt::{MultiSchemeValidator, SchemeRegistry, TokenCodec, TokenIssuer};
use crate::session::SessionManager;
use crate::token::{RefreshTokenStore, TokenBlacklist};

/// Every auth component, built once at startup and shared by clone.
#[derive(Debug, Clone)]
pub struct AuthServices {
    pub registry: Arc<SchemeRegistry>,
    pub codec: TokenCodec,
    pub issuer: TokenIssuer,
    pub validator: MultiSchemeValidator,
    pub blacklist: TokenBlacklist,
    pub refresh_tokens: RefreshTokenStore,
    pub sessions: SessionManager,
}

impl AuthServices {
    /// Builds the components over the given stores, credential source, and clock.
    pub fn build(
        config: &AuthConfig,
        stores: &TokenStores,
        credentials: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let registry = Arc::new(SchemeRegistry::from_config(config)?);
        let leeway = config_duration(config.leeway_seconds, Duration::try_seconds, "leeway_seconds")?;
        let codec = TokenCodec::new(clock.clone(), leeway);
        let issuer = TokenIssuer::new(registry.clone(), codec.clone());
        let blacklist = TokenBlacklist::new(stores.blacklist.clone(), clock.clone(), leeway);
        let validator = MultiSchemeValidator::new(registry.clone(), codec.clone(), blacklist.clone());
        let refresh_tokens = RefreshTokenStore::new(
            stores.refresh_tokens.clone(),
            issuer.clone(),
            credentials.clone(),
            clock,
        );
        let sessions = SessionManager::new(
            credentials,
            issuer.clone(),
            refresh_tokens.clone(),
            blacklist.clone(),
        );

        Ok(Self {
            registry,
            codec,
            issuer,
            validator,
            blacklist,
            refresh_tokens,
            sessions,
        })
    }
}
