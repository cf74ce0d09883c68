//! Share token entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use murmur_core::error::AppError;

/// The two shareable resource kinds.
///
/// `resource_id` on a [`ShareToken`] (and inside a
/// [`super::SharePayload`]) is a polymorphic reference; this enum is the
/// discriminant selecting which store it points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A single post.
    Post,
    /// A user profile.
    User,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Self::Post),
            "user" => Ok(Self::User),
            other => Err(AppError::validation(format!(
                "Invalid resource type: {other}"
            ))),
        }
    }
}

/// A server-issued opaque share credential with lifecycle state.
///
/// Possession of the token string is the entire credential; everything
/// else on this record exists to bound and audit its use. Once
/// `is_active` goes false the record is terminal — no code path sets it
/// back to true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShareToken {
    /// Row identifier.
    pub id: Uuid,
    /// The opaque bearer token (64 hex chars).
    pub token: String,
    /// Kind of resource this token exposes.
    pub resource_type: ResourceType,
    /// The shared resource's ID (interpreted per `resource_type`).
    pub resource_id: Uuid,
    /// The issuing user. Immutable after creation.
    pub created_by: Uuid,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Successful views so far.
    pub access_count: i32,
    /// Optional view cap. `None` = unlimited.
    pub max_access: Option<i32>,
    /// False once revoked, expired, or exhausted.
    pub is_active: bool,
    /// Distinct viewer IP addresses observed (audit only).
    pub ip_addresses: Vec<String>,
    /// Distinct viewer user agents observed (audit only).
    pub user_agents: Vec<String>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// Last successful access, if any.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl ShareToken {
    /// Whether the expiry instant has passed at `now`.
    ///
    /// Expiry is inclusive: a token is unusable *on* its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the access cap has been reached.
    pub fn limit_reached(&self) -> bool {
        matches!(self.max_access, Some(max) if self.access_count >= max)
    }
}

/// Data required to persist a new share token.
#[derive(Debug, Clone)]
pub struct NewShareToken {
    /// The generated opaque token.
    pub token: String,
    /// Kind of resource being shared.
    pub resource_type: ResourceType,
    /// The shared resource's ID.
    pub resource_id: Uuid,
    /// The issuing user.
    pub created_by: Uuid,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Optional view cap.
    pub max_access: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_token(expires_at: DateTime<Utc>, max_access: Option<i32>) -> ShareToken {
        ShareToken {
            id: Uuid::new_v4(),
            token: "ab".repeat(32),
            resource_type: ResourceType::Post,
            resource_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            expires_at,
            access_count: 0,
            max_access,
            is_active: true,
            ip_addresses: vec![],
            user_agents: vec![],
            created_at: Utc::now(),
            last_accessed_at: None,
        }
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let now = Utc::now();
        let token = sample_token(now, None);
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn test_limit_reached_only_with_cap() {
        let mut token = sample_token(Utc::now() + Duration::days(30), None);
        token.access_count = 1_000_000;
        assert!(!token.limit_reached());

        token.max_access = Some(3);
        token.access_count = 2;
        assert!(!token.limit_reached());
        token.access_count = 3;
        assert!(token.limit_reached());
    }

    #[test]
    fn test_resource_type_round_trip() {
        for (s, t) in [("post", ResourceType::Post), ("user", ResourceType::User)] {
            assert_eq!(s.parse::<ResourceType>().expect("parse"), t);
            assert_eq!(t.to_string(), s);
        }
        assert!("folder".parse::<ResourceType>().is_err());
    }
}
