//! Integration tests for single-use rotation and the blacklist lifecycle.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use tokengate_auth::AuthFailure;
use tokengate_worker::{BlacklistPruneJob, SweepJob};

use helpers::TestApp;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_succeeds_exactly_once() {
    let app = TestApp::new();
    let (_, refresh) = app.login_entity_admin().await;

    let attempts = (0..10).map(|_| {
        let app = app.clone();
        let refresh = refresh.clone();
        tokio::spawn(async move {
            app.request(
                "POST",
                "/api/auth/refresh-token",
                Some(json!({"refreshToken": refresh})),
                None,
            )
            .await
        })
    });
    let responses: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let ok = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .count();
    assert_eq!(ok, 1);
    for response in responses.iter().filter(|r| r.status != StatusCode::OK) {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Refresh token not found in database");
    }
}

#[tokio::test]
async fn test_rotation_chain() {
    let app = TestApp::new();
    let (_, mut current) = app.login_subscriber().await;

    for _ in 0..3 {
        let rotated = app
            .request(
                "POST",
                "/api/subscriber/auth/refresh-token",
                Some(json!({"refreshToken": current})),
                None,
            )
            .await;
        assert_eq!(rotated.status, StatusCode::OK);
        let next = rotated.str("refreshToken");

        let replay = app
            .request(
                "POST",
                "/api/subscriber/auth/refresh-token",
                Some(json!({"refreshToken": current})),
                None,
            )
            .await;
        assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
        current = next;
    }
}

#[tokio::test]
async fn test_super_admin_login_replaces_refresh_token() {
    let app = TestApp::new();
    let (_, first) = app.login_super_admin().await;
    let (_, second) = app.login_super_admin().await;

    let stale = app
        .request(
            "POST",
            "/api/auth/super-admin/refresh-token",
            Some(json!({"refreshToken": first})),
            None,
        )
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.body["message"], "Refresh token not found in database");

    let fresh = app
        .request(
            "POST",
            "/api/auth/super-admin/refresh-token",
            Some(json!({"refreshToken": second})),
            None,
        )
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_blacklisted_token_reports_expired_after_prune() {
    let app = TestApp::new();
    let (jwt, _) = app.login_entity_admin().await;

    let logout = app.request("POST", "/api/auth/logout", None, Some(&jwt)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let validator = &app.state.auth.validator;
    assert_eq!(
        validator.validate(&jwt).await.unwrap().reason(),
        Some(AuthFailure::Blacklisted)
    );

    let prune = BlacklistPruneJob::new(app.state.auth.blacklist.clone());
    assert_eq!(prune.run().await.unwrap(), 0);

    app.advance(chrono::Duration::minutes(61));
    assert_eq!(prune.run().await.unwrap(), 1);
    assert_eq!(
        validator.validate(&jwt).await.unwrap().reason(),
        Some(AuthFailure::Expired)
    );
}
