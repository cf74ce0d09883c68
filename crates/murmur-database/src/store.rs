//! Store trait seams between the service layer and the database.
//!
//! Services depend on these traits rather than on concrete repositories
//! so the share logic can be exercised against in-memory fakes. The
//! repositories in [`crate::repositories`] are the production
//! implementations.

use async_trait::async_trait;
use uuid::Uuid;

use murmur_core::result::AppResult;
use murmur_entity::post::Post;
use murmur_entity::share::{NewShareToken, ShareToken};
use murmur_entity::user::User;

/// Read access to user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key. Absence is a normal outcome.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// Read access to post records.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Find a post by primary key. Absence is a normal outcome.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// The author's most recent posts, newest first, at most `limit`.
    async fn find_recent_by_author(&self, author_id: Uuid, limit: i64) -> AppResult<Vec<Post>>;
}

/// Persistence for share tokens.
#[async_trait]
pub trait ShareTokenStore: Send + Sync + 'static {
    /// Persist a freshly issued token with a zeroed access counter.
    async fn insert(&self, data: &NewShareToken) -> AppResult<ShareToken>;

    /// Look up a token regardless of its active flag.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareToken>>;

    /// Atomically claim one access slot.
    ///
    /// Increments the access counter, stamps the access time, and
    /// appends unseen audit entries — if and only if the token is
    /// active, unexpired, and under its cap at the instant of the
    /// update. Returns the post-increment record on success, `None` if
    /// any condition failed. The check and the mutation are one
    /// operation; two concurrent claims on a token with one remaining
    /// slot can never both succeed.
    async fn claim_access(
        &self,
        token: &str,
        ip: &str,
        user_agent: Option<&str>,
    ) -> AppResult<Option<ShareToken>>;

    /// Permanently clear the active flag. Idempotent; never reactivates.
    async fn deactivate(&self, token: &str) -> AppResult<bool>;

    /// All tokens issued by a user, newest first.
    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<ShareToken>>;

    /// Delete expired rows; returns how many were purged.
    async fn purge_expired(&self) -> AppResult<u64>;
}
