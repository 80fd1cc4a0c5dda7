//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use tokengate_api::{AppState, build_app, build_state};
use tokengate_auth::ConfigCredentialStore;
use tokengate_core::config::{AccountConfig, AppConfig, AuthConfig, SchemeConfig};
use tokengate_core::traits::{Clock, ManualClock};
use tokengate_core::types::PrincipalType;
use tokengate_database::TokenStores;

pub const PASSWORD: &str = "correct horse battery";
pub const PIN: &str = "4321";

/// Test application context
#[derive(Clone)]
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching the auth components directly
    pub state: AppState,
    /// Clock driving token issue and expiry
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        let config = test_config();
        let clock = Arc::new(ManualClock::starting_now());
        let credentials = Arc::new(
            ConfigCredentialStore::from_accounts(&config.auth.accounts)
                .expect("Failed to load test accounts"),
        );
        let state = build_state(
            config,
            TokenStores::memory(),
            credentials,
            clock.clone() as Arc<dyn Clock>,
        )
        .expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            clock,
        }
    }

    /// Move the test clock forward
    pub fn advance(&self, by: chrono::Duration) {
        self.clock.advance(by);
    }

    /// Login at `path` and return `(jwt, refreshToken)`
    pub async fn login_at(&self, path: &str, body: Value) -> (String, String) {
        let response = self.request("POST", path, Some(body), None).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        (response.str("jwt"), response.str("refreshToken"))
    }

    pub async fn login_super_admin(&self) -> (String, String) {
        self.login_at(
            "/api/auth/super-admin/login",
            json!({"username": "root", "password": PASSWORD}),
        )
        .await
    }

    pub async fn login_entity_admin(&self) -> (String, String) {
        self.login_at(
            "/api/auth/login",
            json!({"username": "alice", "password": PASSWORD}),
        )
        .await
    }

    pub async fn login_subscriber(&self) -> (String, String) {
        self.login_at(
            "/api/subscriber/auth/login",
            json!({"mobileNumber": "9998887777", "pin": PIN}),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let body = match body {
            Some(b) => {
                req = req.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        let req = req.body(body).expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// A string field of the body, panicking if absent
    pub fn str(&self, field: &str) -> String {
        self.body
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_else(|| panic!("No {field} in {:?}", self.body))
            .to_string()
    }
}

fn hash(password: &str) -> String {
    let salt = SaltString::from_b64("aW50ZWdyYXRpb25zYWx0").expect("salt");
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("hash")
        .to_string()
}

fn scheme(principal_type: PrincipalType, secret: &str) -> SchemeConfig {
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

fn account(username: &str, password_hash: &str, principal_type: PrincipalType) -> AccountConfig {
    AccountConfig {
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        principal_type,
        organization_id: None,
        subscriber_id: None,
        entity_id: None,
    }
}

pub fn test_config() -> AppConfig {
    let password_hash = hash(PASSWORD);
    let pin_hash = hash(PIN);

    AppConfig {
        server: Default::default(),
        database: Default::default(),
        auth: AuthConfig {
            leeway_seconds: 0,
            schemes: vec![
                scheme(
                    PrincipalType::SuperAdmin,
                    "integration-super-admin-secret-integration-super-admin-secret",
                ),
                scheme(
                    PrincipalType::EntityAdmin,
                    "integration-entity-admin-secret-integration-entity-admin-secret",
                ),
                scheme(
                    PrincipalType::Subscriber,
                    "integration-subscriber-secret-integration-subscriber-secret",
                ),
            ],
            accounts: vec![
                account("root", &password_hash, PrincipalType::SuperAdmin),
                AccountConfig {
                    organization_id: Some(42),
                    ..account("alice", &password_hash, PrincipalType::EntityAdmin)
                },
                AccountConfig {
                    organization_id: Some(42),
                    subscriber_id: Some(7),
                    entity_id: Some("MSD00001".to_string()),
                    ..account("9998887777", &pin_hash, PrincipalType::Subscriber)
                },
            ],
        },
        worker: Default::default(),
        logging: Default::default(),
    }
}
