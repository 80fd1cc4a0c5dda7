//! Integration tests for the authorization gate and role guards.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use serde_json::{Value, json};

use tokengate_auth::Authenticated;
use tokengate_auth::jwt::RawClaims;
use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

use helpers::TestApp;

fn claims(value: Value) -> RawClaims {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Signs `payload` with the secret of `scheme`, bypassing the issuer.
fn forge(app: &TestApp, scheme: PrincipalType, payload: Value) -> String {
    let key = app
        .state
        .auth
        .registry
        .get(scheme)
        .expect("scheme configured")
        .encoding_key();
    let (token, _) = app
        .state
        .auth
        .codec
        .sign(claims(payload), key, chrono::Duration::hours(1))
        .expect("sign");
    token
}

#[tokio::test]
async fn test_public_routes_pass_without_token() {
    let app = TestApp::new();
    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["store"], "memory");

    // A bad token does not block a public route either.
    let health = app
        .request("GET", "/api/health", None, Some("not.a.token"))
        .await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_route_without_principal_is_401() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "UNAUTHENTICATED");

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("abc.def"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let basic = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("Authorization", "Basic cm9vdDpwYXNz")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(basic).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_ping_role_guard() {
    let app = TestApp::new();
    let (root, _) = app.login_super_admin().await;
    let (alice, _) = app.login_entity_admin().await;
    let (member, _) = app.login_subscriber().await;

    let ok = app.request("GET", "/api/admin/ping", None, Some(&root)).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "pong, root");

    for token in [&alice, &member] {
        let denied = app.request("GET", "/api/admin/ping", None, Some(token)).await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
        assert_eq!(denied.body["error"], "FORBIDDEN");
    }

    let anonymous = app.request("GET", "/api/admin/ping", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = TestApp::new();
    let (jwt, _) = app.login_entity_admin().await;

    app.advance(chrono::Duration::minutes(59));
    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::OK);

    app.advance(chrono::Duration::minutes(2));
    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer_credential() {
    let app = TestApp::new();
    let (_, refresh) = app.login_super_admin().await;
    let me = app.request("GET", "/api/auth/me", None, Some(&refresh)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_claims_must_match_the_signing_scheme() {
    let app = TestApp::new();

    // Super admin shape, entity admin secret.
    let forged = forge(
        &app,
        PrincipalType::EntityAdmin,
        json!({"sub": "root", "tokenType": "SUPER_ADMIN_ACCESS"}),
    );
    let me = app.request("GET", "/api/auth/me", None, Some(&forged)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let ping = app.request("GET", "/api/admin/ping", None, Some(&forged)).await;
    assert_eq!(ping.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_user_type_shape_is_accepted() {
    let app = TestApp::new();
    let token = forge(
        &app,
        PrincipalType::EntityAdmin,
        json!({"sub": "bob", "tokenType": "ACCESS", "userType": "ENTITY_ADMIN", "orgId": "11"}),
    );

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "bob");
    assert_eq!(me.body["organizationId"], 11);
}

/// Stands in for an earlier authentication layer.
async fn upstream_authentication(mut request: Request<Body>, next: Next) -> Response {
    let principal = CanonicalPrincipal::new(PrincipalType::SuperAdmin, "upstream-admin");
    let extensions = request.extensions_mut();
    extensions.insert(principal.clone());
    extensions.insert(Authenticated {
        principal,
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    });
    next.run(request).await
}

#[tokio::test]
async fn test_already_authenticated_request_passes_the_gate_unchanged() {
    let mut app = TestApp::new();
    app.router = app
        .router
        .clone()
        .layer(middleware::from_fn(upstream_authentication));

    let me = app
        .request("GET", "/api/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "upstream-admin");
    assert_eq!(me.body["principalType"], "SUPER_ADMIN");

    let ping = app
        .request("GET", "/api/admin/ping", None, Some("not.a.token"))
        .await;
    assert_eq!(ping.status, StatusCode::OK);

    let verdict = app
        .request("POST", "/api/auth/validate", None, Some("not.a.token"))
        .await;
    assert_eq!(verdict.body["valid"], true);
}

#[tokio::test]
async fn test_validate_reports_the_verdict() {
    let app = TestApp::new();
    let (jwt, refresh) = app.login_entity_admin().await;

    let valid = app.request("POST", "/api/auth/validate", None, Some(&jwt)).await;
    assert_eq!(valid.status, StatusCode::OK);
    assert_eq!(valid.body["valid"], true);
    assert_eq!(valid.body["principal"]["username"], "alice");
    assert_eq!(valid.body["principal"]["principalType"], "ENTITY_ADMIN");
    assert_eq!(valid.body["principal"]["organizationId"], 42);
    assert!(valid.body["expiresAt"].is_string());
    assert!(valid.body.get("reason").is_none());

    let missing = app.request("POST", "/api/auth/validate", None, None).await;
    assert_eq!(missing.status, StatusCode::OK);
    assert_eq!(missing.body["valid"], false);
    assert_eq!(missing.body["reason"], "MISSING_TOKEN");

    let presented = app
        .request("POST", "/api/auth/validate", None, Some(&refresh))
        .await;
    assert_eq!(presented.body["reason"], "REFRESH_TOKEN_PRESENTED");

    let garbage = app
        .request("POST", "/api/auth/validate", None, Some("abc.def"))
        .await;
    assert_eq!(garbage.body["reason"], "MALFORMED_TOKEN");

    let logout = app.request("POST", "/api/auth/logout", None, Some(&jwt)).await;
    assert_eq!(logout.status, StatusCode::OK);
    let revoked = app.request("POST", "/api/auth/validate", None, Some(&jwt)).await;
    assert_eq!(revoked.body["valid"], false);
    assert_eq!(revoked.body["reason"], "BLACKLISTED");

    let (member, _) = app.login_subscriber().await;
    app.advance(chrono::Duration::hours(25));
    let expired = app
        .request("POST", "/api/auth/validate", None, Some(&member))
        .await;
    assert_eq!(expired.body["valid"], false);
    assert_eq!(expired.body["reason"], "EXPIRED");
}
