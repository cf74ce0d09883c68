//! Integration tests for authentication boundaries and input checks.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "username": "alice",
                "email": "not-an-email",
                "password": "Str0ng-Passw0rd"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let app = helpers::TestApp::new();

    for password in ["short1A", "alllowercase7", "NODIGITSHERE"] {
        let response = app
            .request(
                "POST",
                "/api/auth/signup",
                Some(json!({
                    "username": "alice",
                    "email": "alice@example.com",
                    "password": password
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_signup_rejects_bad_username() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "username": "bad name!",
                "email": "alice@example.com",
                "password": "Str0ng-Passw0rd"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "", "password": "" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
