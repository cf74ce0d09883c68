//! Resource accessor — fetches a `(resource_type, resource_id)` pair
//! with a viewer-safe projection.
//!
//! Both share mechanisms resolve through this component, and it backs
//! their ownership checks at issuance. It is strictly read-only, and a
//! missing resource is a normal `None`, never an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use murmur_core::result::AppResult;
use murmur_database::store::{PostStore, UserStore};
use murmur_entity::post::Post;
use murmur_entity::share::ResourceType;
use murmur_entity::user::{PublicUserProfile, User};

/// Fetches shareable resources with viewer-safe projections.
#[derive(Clone)]
pub struct ResourceAccessor {
    /// User lookups.
    users: Arc<dyn UserStore>,
    /// Post lookups.
    posts: Arc<dyn PostStore>,
    /// How many recent posts a shared profile embeds.
    profile_posts_limit: i64,
}

/// A resolved shareable resource, tagged by kind.
///
/// Serializes as `{"type": "post"|"user", "data": ...}` — the shape both
/// public share endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ResourceView {
    /// A single post with its author's public profile.
    Post(PostView),
    /// A user profile with their recent posts.
    User(UserProfileView),
}

/// A post enriched with the author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// The author's public profile, if the account still exists.
    pub author: Option<PublicUserProfile>,
}

/// A shared user profile with the user's most recent posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileView {
    /// The profile, without credential or contact fields.
    pub user: SharedProfile,
    /// Most recent posts, newest first, bounded.
    pub posts: Vec<Post>,
}

/// Profile fields exposed to (possibly unauthenticated) share viewers.
/// The email and password hash never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedProfile {
    /// User identifier.
    pub id: Uuid,
    /// Handle.
    pub username: String,
    /// Profile bio.
    pub bio: String,
    /// Avatar URL or seed.
    pub avatar: Option<String>,
    /// Users following this user.
    pub followers: Vec<Uuid>,
    /// Users this user follows.
    pub following: Vec<Uuid>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SharedProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            followers: user.followers.clone(),
            following: user.following.clone(),
            created_at: user.created_at,
        }
    }
}

impl ResourceAccessor {
    /// Creates a new resource accessor.
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        profile_posts_limit: i64,
    ) -> Self {
        Self {
            users,
            posts,
            profile_posts_limit,
        }
    }

    /// Fetch a resource for a share viewer.
    ///
    /// Dispatches on the resource kind to one of two fixed fetch paths.
    pub async fn fetch_for_share(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<Option<ResourceView>> {
        match resource_type {
            ResourceType::Post => {
                let Some(post) = self.posts.find_by_id(resource_id).await? else {
                    return Ok(None);
                };
                let author = self
                    .users
                    .find_by_id(post.author_id)
                    .await?
                    .as_ref()
                    .map(PublicUserProfile::from);
                Ok(Some(ResourceView::Post(PostView { post, author })))
            }
            ResourceType::User => {
                let Some(user) = self.users.find_by_id(resource_id).await? else {
                    return Ok(None);
                };
                let posts = self
                    .posts
                    .find_recent_by_author(resource_id, self.profile_posts_limit)
                    .await?;
                Ok(Some(ResourceView::User(UserProfileView {
                    user: SharedProfile::from(&user),
                    posts,
                })))
            }
        }
    }
}

impl std::fmt::Debug for ResourceAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceAccessor")
            .field("profile_posts_limit", &self.profile_posts_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryPostStore, MemoryUserStore, sample_post, sample_user};

    fn accessor(
        users: Arc<MemoryUserStore>,
        posts: Arc<MemoryPostStore>,
    ) -> ResourceAccessor {
        ResourceAccessor::new(users, posts, 10)
    }

    #[tokio::test]
    async fn test_missing_resource_is_none_not_error() {
        let accessor = accessor(
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryPostStore::default()),
        );

        let missing = accessor
            .fetch_for_share(ResourceType::Post, Uuid::new_v4())
            .await
            .expect("fetch");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_post_view_embeds_author() {
        let users = Arc::new(MemoryUserStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let user = sample_user("alice");
        let post = sample_post(&user, "hello world");
        users.put(user.clone());
        posts.put(post.clone());

        let view = accessor(users, posts)
            .fetch_for_share(ResourceType::Post, post.id)
            .await
            .expect("fetch")
            .expect("present");

        let ResourceView::Post(view) = view else {
            panic!("expected a post view");
        };
        assert_eq!(view.post.id, post.id);
        assert_eq!(view.author.expect("author").username, "alice");
    }

    #[tokio::test]
    async fn test_user_view_bounds_recent_posts_newest_first() {
        let users = Arc::new(MemoryUserStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let user = sample_user("alice");
        users.put(user.clone());
        for i in 0..15 {
            posts.put(sample_post(&user, &format!("post {i}")));
        }

        let view = accessor(users, posts)
            .fetch_for_share(ResourceType::User, user.id)
            .await
            .expect("fetch")
            .expect("present");

        let ResourceView::User(view) = view else {
            panic!("expected a user view");
        };
        assert_eq!(view.posts.len(), 10);
        for pair in view.posts.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_shared_views_never_leak_credentials() {
        let users = Arc::new(MemoryUserStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let user = sample_user("alice");
        users.put(user.clone());

        let view = accessor(users, posts)
            .fetch_for_share(ResourceType::User, user.id)
            .await
            .expect("fetch")
            .expect("present");

        let json = serde_json::to_string(&view).expect("serialize");
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("@example.com"));
    }
}
