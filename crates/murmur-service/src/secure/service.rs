//! Encrypted-hash share issuance and resolution.
//!
//! Unlike token shares there is no server-side state: a hash stays
//! resolvable for as long as the resource it points at exists. The
//! codec itself is a pure transform, so the ownership checks live here,
//! with the same rules as the token mechanism.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use murmur_core::config::share::ShareConfig;
use murmur_core::error::AppError;
use murmur_core::result::AppResult;
use murmur_entity::share::ResourceType;

use super::codec::HashCodec;
use crate::context::RequestContext;
use crate::resource::{ResourceAccessor, ResourceView};

/// Outward message for every failed hash resolution, decode and lookup
/// alike.
const INVALID_HASH_MSG: &str = "Invalid or expired share link";

/// Issues and resolves encrypted share hashes.
#[derive(Debug, Clone)]
pub struct SecureShareService {
    /// The encrypting codec.
    codec: Arc<HashCodec>,
    /// Resource fetching and existence checks.
    accessor: Arc<ResourceAccessor>,
    /// Share settings (frontend URL).
    config: ShareConfig,
}

/// A freshly issued encrypted hash.
#[derive(Debug, Clone)]
pub struct IssuedHash {
    /// The URL-safe hash.
    pub hash: String,
    /// Full shareable URL.
    pub share_url: String,
}

impl SecureShareService {
    /// Creates a new secure share service.
    pub fn new(codec: Arc<HashCodec>, accessor: Arc<ResourceAccessor>, config: ShareConfig) -> Self {
        Self {
            codec,
            accessor,
            config,
        }
    }

    /// Issues a hash for a post the caller authored.
    pub async fn issue_post_share(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
    ) -> AppResult<IssuedHash> {
        let view = self
            .accessor
            .fetch_for_share(ResourceType::Post, post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if let ResourceView::Post(post) = &view {
            if post.post.author_id != ctx.user_id {
                return Err(AppError::forbidden("Not authorized to share this post"));
            }
        }

        self.issue(ctx, ResourceType::Post, post_id)
    }

    /// Issues a hash for the caller's own profile.
    pub async fn issue_user_share(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> AppResult<IssuedHash> {
        self.accessor
            .fetch_for_share(ResourceType::User, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user_id != ctx.user_id {
            return Err(AppError::forbidden("Not authorized to share this profile"));
        }

        self.issue(ctx, ResourceType::User, user_id)
    }

    /// Resolves a hash for a (possibly unauthenticated) viewer.
    ///
    /// Every failure — undecodable hash or vanished resource — resolves
    /// to the same outward answer.
    pub async fn resolve_hash(&self, hash: &str) -> AppResult<ResourceView> {
        let payload = self.codec.resolve(hash)?;

        self.accessor
            .fetch_for_share(payload.resource_type, payload.resource_id)
            .await?
            .ok_or_else(|| AppError::not_found(INVALID_HASH_MSG))
    }

    fn issue(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<IssuedHash> {
        let hash = self.codec.issue(resource_type, resource_id)?;

        info!(
            user_id = %ctx.user_id,
            resource_type = %resource_type,
            "Encrypted share hash issued"
        );

        Ok(IssuedHash {
            share_url: format!("{}/s/{}", self.config.frontend_url, hash),
            hash,
        })
    }
}
