//! Integration tests for login, refresh and logout over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_super_admin_login_and_me() {
    let app = TestApp::new();
    let (jwt, refresh) = app.login_super_admin().await;
    assert!(!refresh.is_empty());

    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "root");
    assert_eq!(me.body["principalType"], "SUPER_ADMIN");
    assert_eq!(me.body["authority"], "ROLE_SUPER_ADMIN");
}

#[tokio::test]
async fn test_entity_admin_me_carries_organization() {
    let app = TestApp::new();
    let (jwt, _) = app.login_entity_admin().await;

    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["principalType"], "ENTITY_ADMIN");
    assert_eq!(me.body["organizationId"], 42);
}

#[tokio::test]
async fn test_subscriber_login_with_mobile_number() {
    let app = TestApp::new();
    let (jwt, _) = app.login_subscriber().await;

    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "9998887777");
    assert_eq!(me.body["role"], "MEMBER");
    assert_eq!(me.body["authority"], "ROLE_SUBSCRIBER");
    assert_eq!(me.body["subscriberId"], 7);
    assert_eq!(me.body["entityId"], "MSD00001");
    assert!(me.body.get("organizationId").is_none());
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"username": "alice", "password": "wrong"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION_FAILED");
    assert_eq!(response.body["message"], "Incorrect username or password");
    assert_eq!(response.body["status"], 401);

    let response = app
        .request(
            "POST",
            "/api/subscriber/auth/login",
            Some(json!({"mobileNumber": "9998887777", "pin": "0000"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid mobile number or PIN");
}

#[tokio::test]
async fn test_login_is_scoped_to_its_principal_type() {
    let app = TestApp::new();

    // alice is an entity admin, not a super admin.
    let response = app
        .request(
            "POST",
            "/api/auth/super-admin/login",
            Some(json!({"username": "alice", "password": PASSWORD})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"username": "", "password": PASSWORD})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_dies() {
    let app = TestApp::new();
    let (_, refresh) = app.login_entity_admin().await;

    let rotated = app
        .request(
            "POST",
            "/api/auth/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let new_access = rotated.str("accessToken");
    let new_refresh = rotated.str("refreshToken");
    assert_ne!(new_refresh, refresh);

    let me = app.request("GET", "/api/auth/me", None, Some(&new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    let replay = app
        .request(
            "POST",
            "/api/auth/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["message"], "Refresh token not found in database");
    assert_eq!(replay.body["error"], "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn test_refresh_at_wrong_endpoint() {
    let app = TestApp::new();
    let (access, refresh) = app.login_entity_admin().await;

    let response = app
        .request(
            "POST",
            "/api/auth/super-admin/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid Super Admin refresh token");

    let response = app
        .request(
            "POST",
            "/api/subscriber/auth/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(response.body["message"], "Invalid Subscriber refresh token");

    // An access token is not a refresh token.
    let response = app
        .request(
            "POST",
            "/api/auth/refresh-token",
            Some(json!({"refreshToken": access})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_refresh_token() {
    let app = TestApp::new();
    let (_, refresh) = app.login_subscriber().await;

    app.advance(chrono::Duration::days(8));
    let response = app
        .request(
            "POST",
            "/api/subscriber/auth/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Refresh token expired");
    assert_eq!(response.body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_logout_revokes_everything() {
    let app = TestApp::new();
    let (jwt, refresh) = app.login_entity_admin().await;

    let logout = app.request("POST", "/api/auth/logout", None, Some(&jwt)).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["refreshTokensRevoked"], 1);

    let me = app.request("GET", "/api/auth/me", None, Some(&jwt)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh-token",
            Some(json!({"refreshToken": refresh})),
            None,
        )
        .await;
    assert_eq!(response.body["message"], "Refresh token not found in database");
}

#[tokio::test]
async fn test_logout_with_one_refresh_token_keeps_others() {
    let app = TestApp::new();
    let (jwt, first) = app.login_entity_admin().await;
    let (_, second) = app.login_entity_admin().await;

    let logout = app
        .request(
            "POST",
            "/api/auth/logout",
            Some(json!({"refreshToken": first})),
            Some(&jwt),
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["refreshTokensRevoked"], 1);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh-token",
            Some(json!({"refreshToken": second})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_requires_authentication() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
