//! Fixtures shared by the unit tests.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use chrono::Duration;

use tokengate_core::config::{AccountConfig, AuthConfig, SchemeConfig};
use tokengate_core::traits::{Clock, ManualClock};
use tokengate_core::types::PrincipalType;
use tokengate_database::TokenStores;

use crate::credential::ConfigCredentialStore;
use crate::services::AuthServices;

pub const SUPER_ADMIN_SECRET: &str = "super-admin-secret-super-admin-secret-super-admin-secret-0001";
pub const ENTITY_ADMIN_SECRET: &str = "entity-admin-secret-entity-admin-secret-entity-admin-secret-02";
pub const SUBSCRIBER_SECRET: &str = "subscriber-secret-subscriber-secret-subscriber-secret-00000003";
pub const PASSWORD: &str = "correct horse battery";

pub fn hash_password(password: &str) -> String {
    let salt = SaltString::from_b64("dGVzdHNhbHR0ZXN0c2FsdA").unwrap();
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn scheme(principal_type: PrincipalType, secret: &str) -> SchemeConfig {
    let (access_ttl_minutes, refresh_ttl_hours) = match principal_type {
        PrincipalType::SuperAdmin => (2 * 60, 3 * 24),
        PrincipalType::EntityAdmin => (60, 7 * 24),
        PrincipalType::Subscriber => (24 * 60, 7 * 24),
    };
    SchemeConfig {
        principal_type,
        secret: secret.to_string(),
        access_ttl_minutes: Some(access_ttl_minutes),
        refresh_ttl_hours: Some(refresh_ttl_hours),
    }
}

pub fn auth_config() -> AuthConfig {
    let hash = hash_password(PASSWORD);
    AuthConfig {
        leeway_seconds: 0,
        schemes: vec![
            scheme(PrincipalType::SuperAdmin, SUPER_ADMIN_SECRET),
            scheme(PrincipalType::EntityAdmin, ENTITY_ADMIN_SECRET),
            scheme(PrincipalType::Subscriber, SUBSCRIBER_SECRET),
        ],
        accounts: vec![
            AccountConfig {
                username: "root".to_string(),
                password_hash: hash.clone(),
                principal_type: PrincipalType::SuperAdmin,
                organization_id: None,
                subscriber_id: None,
                entity_id: None,
            },
            AccountConfig {
                username: "alice".to_string(),
                password_hash: hash.clone(),
                principal_type: PrincipalType::EntityAdmin,
                organization_id: Some(42),
                subscriber_id: None,
                entity_id: None,
            },
            AccountConfig {
                username: "9998887777".to_string(),
                password_hash: hash,
                principal_type: PrincipalType::Subscriber,
                organization_id: Some(42),
                subscriber_id: Some(7),
                entity_id: Some("MSD00001".to_string()),
            },
        ],
    }
}

pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub stores: TokenStores,
    pub services: AuthServices,
}

impl Fixture {
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

pub fn fixture() -> Fixture {
    fixture_with(auth_config())
}

pub fn fixture_with(config: AuthConfig) -> Fixture {
    let clock = Arc::new(ManualClock::starting_now());
    let stores = TokenStores::memory();
    let credentials = Arc::new(ConfigCredentialStore::from_accounts(&config.accounts).unwrap());
    let services =
        AuthServices::build(&config, &stores, credentials, clock.clone() as Arc<dyn Clock>)
            .unwrap();
    Fixture {
        clock,
        stores,
        services,
    }
}
