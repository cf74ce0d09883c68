//! Integration tests for encrypted-hash share endpoints.
//!
//! Resolution failures must be uniform: garbage, tampering, and hashes
//! from a foreign key context all produce the same outward answer.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use murmur_entity::share::ResourceType;
use murmur_service::secure::codec::HashCodec;

#[tokio::test]
async fn test_issuance_requires_auth() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/secure-share/post",
            Some(json!({ "postId": Uuid::new_v4() })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/secure-share/user",
            Some(json!({ "userId": Uuid::new_v4() })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_hash_is_uniform_404() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/secure-share/definitely-not-a-hash", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Invalid or expired share link");
}

#[tokio::test]
async fn test_foreign_key_hash_matches_garbage_answer() {
    let app = helpers::TestApp::new();

    // A structurally valid hash encrypted under a different key
    let foreign = HashCodec::from_key_bytes([42u8; 32])
        .issue(ResourceType::Post, Uuid::new_v4())
        .expect("issue");

    let foreign_resp = app
        .request("GET", &format!("/api/secure-share/{foreign}"), None, None)
        .await;
    let garbage_resp = app
        .request("GET", "/api/secure-share/zzzz", None, None)
        .await;

    assert_eq!(foreign_resp.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_resp.status, garbage_resp.status);
    assert_eq!(foreign_resp.body, garbage_resp.body);
}

#[tokio::test]
async fn test_tampered_hash_is_rejected() {
    let app = helpers::TestApp::new();

    // Issue under the app's own key, then flip one character
    let codec = HashCodec::new(&app.config.share.hash_secret);
    let hash = codec
        .issue(ResourceType::Post, Uuid::new_v4())
        .expect("issue");
    let mut tampered: Vec<char> = hash.chars().collect();
    let mid = tampered.len() / 2;
    tampered[mid] = if tampered[mid] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    let response = app
        .request("GET", &format!("/api/secure-share/{tampered}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Invalid or expired share link");
}
