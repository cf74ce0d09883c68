//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user of the Murmur platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle, 3-20 characters of `[A-Za-z0-9_]`.
    pub username: String,
    /// Email address used for login.
    pub email: String,
    /// Argon2id password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Free-form profile bio.
    pub bio: String,
    /// Avatar URL or avatar seed.
    pub avatar: Option<String>,
    /// Users following this user.
    pub followers: Vec<Uuid>,
    /// Users this user follows.
    pub following: Vec<Uuid>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether this user follows `other`.
    pub fn is_following(&self, other: Uuid) -> bool {
        self.following.contains(&other)
    }
}

/// Viewer-safe projection of a user, embedded in post views, follower
/// lists, and shared content. Never carries credential fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Handle.
    pub username: String,
    /// Profile bio.
    pub bio: String,
    /// Avatar URL or seed.
    pub avatar: Option<String>,
}

impl From<&User> for PublicUserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New username (must remain unique).
    pub username: Option<String>,
    /// New bio.
    pub bio: Option<String>,
    /// New avatar URL or seed.
    pub avatar: Option<String>,
}
