//! Authentication endpoint tests

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use crate::common::{seed_user, TestApp, TEST_PASSWORD};
use imaging_central::middleware::Claims;

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let app = TestApp::new().await;
    let user = seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": TEST_PASSWORD}),
        )
        .await;

    response.assert_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert!(body["user"].get("password_hash").is_none());

    // The issued token works against a protected endpoint
    let token = body["token"].as_str().expect("token missing");
    let profile = app.get_auth("/api/v1/auth/profile", token).await;
    profile.assert_ok();
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new().await;
    seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "ALICE@Example.COM", "password": TEST_PASSWORD}),
        )
        .await;

    response.assert_ok();
}

#[tokio::test]
async fn test_login_failure_does_not_reveal_which_part_was_wrong() {
    let app = TestApp::new().await;
    seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let wrong_password = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": "wrong-password"}),
        )
        .await;
    wrong_password.assert_unauthorized();

    let unknown_email = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "nobody@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    unknown_email.assert_unauthorized();

    // Identical bodies, so the response cannot be used to probe for accounts
    let a: serde_json::Value = wrong_password.json();
    let b: serde_json::Value = unknown_email.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_login_validates_payload() {
    let app = TestApp::new().await;

    let bad_email = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "not-an-email", "password": TEST_PASSWORD}),
        )
        .await;
    bad_email.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    let short_password = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": "abc"}),
        )
        .await;
    short_password.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_profile_returns_current_user() {
    let app = TestApp::new().await;
    let user = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let token = app.token_for(&user);

    let response = app.get_auth("/api/v1/auth/profile", &token).await;
    response.assert_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn test_profile_rejects_token_for_unknown_user() {
    let app = TestApp::new().await;

    // Valid signature, but the subject was never created
    let token = crate::common::generate_test_token(
        &app.state.config,
        Uuid::new_v4(),
        "ghost@example.com",
    );

    let response = app.get_auth("/api/v1/auth/profile", &token).await;
    response.assert_unauthorized();
    response.assert_message_contains("User account not found");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let user = seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        iat: now - 7200,
        exp: now - 3600,
        nbf: now - 7200,
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.state.config.auth.jwt_secret.as_bytes()),
    )
    .expect("Failed to encode token");

    let response = app.get_auth("/api/v1/auth/profile", &token).await;
    response.assert_unauthorized();
    response.assert_message_contains("expired");
}

#[tokio::test]
async fn test_auth_responses_are_not_cacheable() {
    let app = TestApp::new().await;
    let user = seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let login = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    login.assert_ok();
    assert_eq!(
        login.headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );

    let token = app.token_for(&user);
    let profile = app.get_auth("/api/v1/auth/profile", &token).await;
    profile.assert_ok();
    assert_eq!(
        profile.headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
}
