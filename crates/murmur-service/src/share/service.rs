//! Token share manager — issues, resolves, revokes, and lists share
//! tokens with server-side lifecycle state.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use murmur_core::config::share::ShareConfig;
use murmur_core::error::AppError;
use murmur_core::result::AppResult;
use murmur_database::store::ShareTokenStore;
use murmur_entity::share::{NewShareToken, ResourceType, ShareToken};

use super::link::LinkService;
use crate::context::RequestContext;
use crate::resource::{ResourceAccessor, ResourceView};

/// Outward message when a token is absent or revoked. Revocation must
/// not be distinguishable from a token that never existed.
const INVALID_LINK_MSG: &str = "Invalid or expired share link";

/// Manages the token share lifecycle.
#[derive(Clone)]
pub struct ShareService {
    /// Share token persistence.
    store: Arc<dyn ShareTokenStore>,
    /// Resource fetching and existence checks.
    accessor: Arc<ResourceAccessor>,
    /// Token generator.
    links: LinkService,
    /// Share settings (frontend URL, default expiry).
    config: ShareConfig,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("accessor", &self.accessor)
            .field("config", &self.config)
            .finish()
    }
}

/// Request to create a new share token.
#[derive(Debug, Clone)]
pub struct CreateShareRequest {
    /// Kind of resource being shared.
    pub resource_type: ResourceType,
    /// The resource's ID.
    pub resource_id: Uuid,
    /// Lifetime in days; the configured default when absent.
    pub expires_in_days: Option<i64>,
    /// Optional view cap; unlimited when absent.
    pub max_access: Option<i32>,
}

/// A freshly issued share token.
#[derive(Debug, Clone)]
pub struct CreatedShare {
    /// The opaque token.
    pub token: String,
    /// Full shareable URL.
    pub share_url: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The view cap, if any.
    pub max_access: Option<i32>,
}

/// A successfully resolved share view.
#[derive(Debug, Clone)]
pub struct SharedResource {
    /// The viewer-safe resource.
    pub resource: ResourceView,
    /// Access count after this view.
    pub access_count: i32,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        store: Arc<dyn ShareTokenStore>,
        accessor: Arc<ResourceAccessor>,
        links: LinkService,
        config: ShareConfig,
    ) -> Self {
        Self {
            store,
            accessor,
            links,
            config,
        }
    }

    /// Creates a share token for a resource the caller owns.
    ///
    /// The resource must exist (NotFound otherwise) and the caller must
    /// own it: posts are shareable by their author, profiles only by
    /// their own user.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> AppResult<CreatedShare> {
        if matches!(req.expires_in_days, Some(days) if days <= 0) {
            return Err(AppError::validation("expiresInDays must be positive"));
        }
        if matches!(req.max_access, Some(max) if max <= 0) {
            return Err(AppError::validation("maxAccess must be positive"));
        }

        self.check_ownership(ctx, req.resource_type, req.resource_id)
            .await?;

        let token = self.links.generate_token();
        let days = req.expires_in_days.unwrap_or(self.config.default_expiry_days);
        let expires_at = Utc::now() + Duration::days(days);

        let record = self
            .store
            .insert(&NewShareToken {
                token,
                resource_type: req.resource_type,
                resource_id: req.resource_id,
                created_by: ctx.user_id,
                expires_at,
                max_access: req.max_access,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            resource_type = %record.resource_type,
            resource_id = %record.resource_id,
            expires_at = %record.expires_at,
            "Share token created"
        );

        Ok(CreatedShare {
            share_url: format!("{}/share/{}", self.config.frontend_url, record.token),
            token: record.token,
            expires_at: record.expires_at,
            max_access: record.max_access,
        })
    }

    /// Resolves a share token for a (possibly unauthenticated) viewer.
    ///
    /// The access claim — active check, expiry check, cap check, and
    /// counter increment — happens as one conditional store update, so
    /// concurrent viewers cannot overshoot the cap. A failed claim is
    /// then classified for the caller, with revoked and never-existed
    /// collapsed into one answer.
    pub async fn resolve_share(
        &self,
        token: &str,
        viewer_ip: &str,
        viewer_user_agent: Option<&str>,
    ) -> AppResult<SharedResource> {
        let claimed = self
            .store
            .claim_access(token, viewer_ip, viewer_user_agent)
            .await?;

        let Some(claimed) = claimed else {
            return Err(self.classify_failed_claim(token).await?);
        };

        let resource = self
            .accessor
            .fetch_for_share(claimed.resource_type, claimed.resource_id)
            .await?
            .ok_or_else(|| match claimed.resource_type {
                ResourceType::Post => AppError::not_found("Post not found"),
                ResourceType::User => AppError::not_found("User not found"),
            })?;

        Ok(SharedResource {
            resource,
            access_count: claimed.access_count,
            expires_at: claimed.expires_at,
        })
    }

    /// Revokes a share token. Only the issuer may revoke, and revocation
    /// is permanent — an already-inactive token revokes as a no-op.
    pub async fn revoke_share(&self, ctx: &RequestContext, token: &str) -> AppResult<()> {
        let record = self
            .store
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share token not found"))?;

        if record.created_by != ctx.user_id {
            return Err(AppError::forbidden(
                "Not authorized to revoke this share link",
            ));
        }

        self.store.deactivate(token).await?;

        info!(user_id = %ctx.user_id, "Share token revoked");
        Ok(())
    }

    /// Lists the caller's share tokens, newest first.
    pub async fn list_shares(&self, ctx: &RequestContext) -> AppResult<Vec<ShareToken>> {
        self.store.list_by_creator(ctx.user_id).await
    }

    /// Explains why a claim failed, flipping the terminal flag where the
    /// cause is expiry or exhaustion.
    ///
    /// Expiry and exhaustion are checked before the active flag so those
    /// tokens keep answering Gone after the flag flips; only pure
    /// revocation falls through to the generic not-found answer.
    async fn classify_failed_claim(&self, token: &str) -> AppResult<AppError> {
        let Some(snapshot) = self.store.find_by_token(token).await? else {
            return Ok(AppError::not_found(INVALID_LINK_MSG));
        };

        if snapshot.is_expired(Utc::now()) {
            if snapshot.is_active {
                self.store.deactivate(token).await?;
            }
            return Ok(AppError::gone("This share link has expired"));
        }

        if snapshot.limit_reached() {
            if snapshot.is_active {
                self.store.deactivate(token).await?;
            }
            return Ok(AppError::gone(
                "This share link has reached its access limit",
            ));
        }

        // Revoked and never-existed answer identically; an active,
        // unexpired, under-limit snapshot only appears here when the
        // claim raced the expiry boundary, and gets the same answer.
        Ok(AppError::not_found(INVALID_LINK_MSG))
    }

    /// Ownership rules shared with the encrypted-hash mechanism: a post
    /// belongs to its author, a profile only to its own user.
    async fn check_ownership(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<()> {
        let view = self
            .accessor
            .fetch_for_share(resource_type, resource_id)
            .await?;

        match (resource_type, view) {
            (ResourceType::Post, None) => Err(AppError::not_found("Post not found")),
            (ResourceType::User, None) => Err(AppError::not_found("User not found")),
            (ResourceType::Post, Some(ResourceView::Post(post))) => {
                if post.post.author_id != ctx.user_id {
                    return Err(AppError::forbidden("Not authorized to share this post"));
                }
                Ok(())
            }
            (ResourceType::User, Some(_)) => {
                if resource_id != ctx.user_id {
                    return Err(AppError::forbidden("Not authorized to share this profile"));
                }
                Ok(())
            }
            _ => Err(AppError::internal("Resource accessor returned wrong kind")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MemoryPostStore, MemoryShareTokenStore, MemoryUserStore, ctx_for, sample_post, sample_user,
    };
    use murmur_core::error::ErrorKind;

    struct Fixture {
        service: ShareService,
        store: Arc<MemoryShareTokenStore>,
        users: Arc<MemoryUserStore>,
        posts: Arc<MemoryPostStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let store = Arc::new(MemoryShareTokenStore::default());
        let accessor = Arc::new(ResourceAccessor::new(users.clone(), posts.clone(), 10));
        let service = ShareService::new(
            store.clone(),
            accessor,
            LinkService::new(),
            ShareConfig::default(),
        );
        Fixture {
            service,
            store,
            users,
            posts,
        }
    }

    #[tokio::test]
    async fn test_create_share_defaults_to_30_days() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        let before = Utc::now();
        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::User,
                    resource_id: alice.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .expect("create");

        let days = (created.expires_at - before).num_days();
        assert!((29..=30).contains(&days));
        assert_eq!(created.token.len(), 64);
        assert!(created.share_url.ends_with(&created.token));
        assert_eq!(created.max_access, None);
    }

    #[tokio::test]
    async fn test_create_share_for_unowned_post_is_forbidden() {
        let fx = fixture();
        let alice = sample_user("alice");
        let bob = sample_user("bob");
        let post = sample_post(&alice, "mine");
        fx.users.put(alice.clone());
        fx.users.put(bob.clone());
        fx.posts.put(post.clone());

        let err = fx
            .service
            .create_share(
                &ctx_for(&bob),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: post.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = fx
            .service
            .create_share(
                &ctx_for(&bob),
                CreateShareRequest {
                    resource_type: ResourceType::User,
                    resource_id: alice.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_create_share_for_missing_resource_is_not_found() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        let err = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: Uuid::new_v4(),
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_counts_and_audits() {
        let fx = fixture();
        let alice = sample_user("alice");
        let post = sample_post(&alice, "hello");
        fx.users.put(alice.clone());
        fx.posts.put(post.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: post.id,
                    expires_in_days: Some(7),
                    max_access: None,
                },
            )
            .await
            .expect("create");

        let first = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", Some("curl/8"))
            .await
            .expect("resolve");
        assert_eq!(first.access_count, 1);

        // Same viewer again: count moves, audit sets do not grow
        let second = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", Some("curl/8"))
            .await
            .expect("resolve");
        assert_eq!(second.access_count, 2);

        let record = fx.store.get(&created.token).expect("record");
        assert_eq!(record.ip_addresses, vec!["10.0.0.1"]);
        assert_eq!(record.user_agents, vec!["curl/8"]);

        fx.service
            .resolve_share(&created.token, "10.0.0.2", None)
            .await
            .expect("resolve");
        let record = fx.store.get(&created.token).expect("record");
        assert_eq!(record.ip_addresses, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(record.user_agents, vec!["curl/8"]);
    }

    #[tokio::test]
    async fn test_single_use_token_scenario() {
        let fx = fixture();
        let alice = sample_user("alice");
        let post = sample_post(&alice, "one view only");
        fx.users.put(alice.clone());
        fx.posts.put(post.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: post.id,
                    expires_in_days: Some(30),
                    max_access: Some(1),
                },
            )
            .await
            .expect("create");

        let first = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .expect("first view succeeds");
        assert_eq!(first.access_count, 1);

        let err = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Gone);

        // The creator's listing shows the token flipped inactive
        let shares = fx
            .service
            .list_shares(&ctx_for(&alice))
            .await
            .expect("list");
        assert_eq!(shares.len(), 1);
        assert!(!shares[0].is_active);
        assert_eq!(shares[0].access_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_never_overshoots_cap() {
        let fx = fixture();
        let alice = sample_user("alice");
        let post = sample_post(&alice, "contended");
        fx.users.put(alice.clone());
        fx.posts.put(post.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: post.id,
                    expires_in_days: Some(30),
                    max_access: Some(5),
                },
            )
            .await
            .expect("create");

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = fx.service.clone();
            let token = created.token.clone();
            handles.push(tokio::spawn(async move {
                service
                    .resolve_share(&token, &format!("10.0.0.{i}"), None)
                    .await
                    .is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.expect("join") {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        let record = fx.store.get(&created.token).expect("record");
        assert_eq!(record.access_count, 5);
    }

    #[tokio::test]
    async fn test_expired_token_is_gone_and_terminal() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::User,
                    resource_id: alice.id,
                    expires_in_days: Some(5),
                    max_access: None,
                },
            )
            .await
            .expect("create");

        fx.store
            .set_expiry(&created.token, Utc::now() - Duration::seconds(1));

        let err = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Gone);

        // Lazy expiry flipped the flag; later attempts still answer Gone
        let record = fx.store.get(&created.token).expect("record");
        assert!(!record.is_active);
        let err = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Gone);
    }

    #[tokio::test]
    async fn test_revoked_token_is_indistinguishable_from_missing() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::User,
                    resource_id: alice.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .expect("create");

        fx.service
            .revoke_share(&ctx_for(&alice), &created.token)
            .await
            .expect("revoke");

        let revoked_err = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .unwrap_err();
        let missing_err = fx
            .service
            .resolve_share(&"0".repeat(64), "10.0.0.1", None)
            .await
            .unwrap_err();

        assert_eq!(revoked_err.kind, missing_err.kind);
        assert_eq!(revoked_err.message, missing_err.message);
    }

    #[tokio::test]
    async fn test_revoke_is_owner_only_and_idempotent() {
        let fx = fixture();
        let alice = sample_user("alice");
        let bob = sample_user("bob");
        fx.users.put(alice.clone());
        fx.users.put(bob.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::User,
                    resource_id: alice.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .expect("create");

        let err = fx
            .service
            .revoke_share(&ctx_for(&bob), &created.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        fx.service
            .revoke_share(&ctx_for(&alice), &created.token)
            .await
            .expect("revoke");
        // Second revoke: accepted as a no-op, never reactivates
        fx.service
            .revoke_share(&ctx_for(&alice), &created.token)
            .await
            .expect("second revoke");
        assert!(!fx.store.get(&created.token).expect("record").is_active);
    }

    #[tokio::test]
    async fn test_vanished_resource_reports_not_found_after_claim() {
        let fx = fixture();
        let alice = sample_user("alice");
        let post = sample_post(&alice, "soon deleted");
        fx.users.put(alice.clone());
        fx.posts.put(post.clone());

        let created = fx
            .service
            .create_share(
                &ctx_for(&alice),
                CreateShareRequest {
                    resource_type: ResourceType::Post,
                    resource_id: post.id,
                    expires_in_days: None,
                    max_access: None,
                },
            )
            .await
            .expect("create");

        fx.posts.remove(post.id);

        let err = fx
            .service
            .resolve_share(&created.token, "10.0.0.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Post not found");
    }

    #[tokio::test]
    async fn test_list_shares_is_newest_first() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        for days in [1_i64, 2, 3] {
            fx.service
                .create_share(
                    &ctx_for(&alice),
                    CreateShareRequest {
                        resource_type: ResourceType::User,
                        resource_id: alice.id,
                        expires_in_days: Some(days),
                        max_access: None,
                    },
                )
                .await
                .expect("create");
        }

        let shares = fx
            .service
            .list_shares(&ctx_for(&alice))
            .await
            .expect("list");
        assert_eq!(shares.len(), 3);
        for pair in shares.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_rejects_nonpositive_limits() {
        let fx = fixture();
        let alice = sample_user("alice");
        fx.users.put(alice.clone());

        for (days, max) in [(Some(0_i64), None), (None, Some(0_i32)), (Some(-3), None)] {
            let err = fx
                .service
                .create_share(
                    &ctx_for(&alice),
                    CreateShareRequest {
                        resource_type: ResourceType::User,
                        resource_id: alice.id,
                        expires_in_days: days,
                        max_access: max,
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }
}
