//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Update profile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New username.
    pub username: Option<String>,
    /// New bio.
    pub bio: Option<String>,
    /// New avatar URL or seed.
    pub avatar: Option<String>,
}

/// Create post request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Post text.
    pub text: Option<String>,
    /// Image URL.
    pub image_url: Option<String>,
}

/// Comment or reply request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    /// Comment text.
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

/// Create share token request.
///
/// `resource_type` arrives as a raw string so an unknown kind can be
/// answered with the same validation error the rest of the body gets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// `"post"` or `"user"`.
    pub resource_type: String,
    /// The resource's ID.
    pub resource_id: Uuid,
    /// Lifetime in days (default 30).
    pub expires_in_days: Option<i64>,
    /// View cap (default unlimited).
    pub max_access: Option<i32>,
}

/// Encrypted post share request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureSharePostRequest {
    /// Post to share.
    pub post_id: Uuid,
}

/// Encrypted profile share request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureShareUserRequest {
    /// Profile to share (must be the caller's own).
    pub user_id: Uuid,
}

/// Feed query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedQuery {
    /// `"recent"` (default), `"liked"`, or `"commented"`.
    pub sort: Option<String>,
}

/// Search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    /// Search text.
    pub q: Option<String>,
}
