//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use murmur_entity::user::User;
use murmur_service::resource::ResourceView;

/// Authentication response: fresh tokens and the user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Access token for the Authorization header.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub msg: String,
}

/// Share token creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    /// Always true on success.
    pub success: bool,
    /// Full shareable URL.
    pub share_url: String,
    /// The opaque token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// View cap; `null` means unlimited.
    pub max_access: Option<i32>,
}

/// Resolved token share response: the tagged resource plus usage state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedResourceResponse {
    /// The resource, serialized as `type` + `data`.
    #[serde(flatten)]
    pub resource: ResourceView,
    /// Access count including this view.
    pub access_count: i32,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Encrypted hash issuance response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedHashResponse {
    /// Always true on success.
    pub success: bool,
    /// Full shareable URL.
    pub share_url: String,
    /// The URL-safe hash.
    pub hash: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
