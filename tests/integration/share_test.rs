//! Integration tests for token share endpoint boundaries.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_share_requires_auth() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/share/create",
            Some(json!({
                "resourceType": "post",
                "resourceId": Uuid::new_v4()
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_share_rejects_unknown_resource_type() {
    let app = helpers::TestApp::new();
    let token = app.access_token_for("alice");

    let response = app
        .request(
            "POST",
            "/api/share/create",
            Some(json!({
                "resourceType": "folder",
                "resourceId": Uuid::new_v4()
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_share_rejects_nonpositive_expiry() {
    let app = helpers::TestApp::new();
    let token = app.access_token_for("alice");

    let response = app
        .request(
            "POST",
            "/api/share/create",
            Some(json!({
                "resourceType": "post",
                "resourceId": Uuid::new_v4(),
                "expiresInDays": 0
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_share_rejects_nonpositive_max_access() {
    let app = helpers::TestApp::new();
    let token = app.access_token_for("alice");

    let response = app
        .request(
            "POST",
            "/api/share/create",
            Some(json!({
                "resourceType": "user",
                "resourceId": Uuid::new_v4(),
                "maxAccess": -1
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_shares_requires_auth() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/share/mine", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoke_requires_auth() {
    let app = helpers::TestApp::new();

    let response = app
        .request("DELETE", &format!("/api/share/{}", "0".repeat(64)), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
