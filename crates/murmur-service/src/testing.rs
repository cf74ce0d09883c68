//! In-memory store fakes and fixture builders for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use murmur_core::result::AppResult;
use murmur_database::store::{PostStore, ShareTokenStore, UserStore};
use murmur_entity::post::Post;
use murmur_entity::share::{NewShareToken, ShareToken};
use murmur_entity::user::User;

use crate::context::RequestContext;

/// Monotonic counter so fixture timestamps are strictly ordered even
/// within one clock tick.
static SEQ: AtomicI64 = AtomicI64::new(0);

fn next_instant() -> chrono::DateTime<Utc> {
    let step = SEQ.fetch_add(1, Ordering::Relaxed);
    Utc::now() + Duration::milliseconds(step)
}

/// Build a user fixture.
pub fn sample_user(username: &str) -> User {
    let created = next_instant();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$fixture".to_string(),
        bio: String::new(),
        avatar: None,
        followers: vec![],
        following: vec![],
        created_at: created,
        updated_at: created,
    }
}

/// Build a post fixture authored by `user`.
pub fn sample_post(user: &User, text: &str) -> Post {
    let created = next_instant();
    Post {
        id: Uuid::new_v4(),
        author_id: user.id,
        username: user.username.clone(),
        text: Some(text.to_string()),
        image_url: None,
        likes: Json(vec![]),
        comments: Json(vec![]),
        created_at: created,
        updated_at: created,
    }
}

/// Build a request context acting as `user`.
pub fn ctx_for(user: &User) -> RequestContext {
    RequestContext::new(
        user.id,
        user.username.clone(),
        "127.0.0.1".to_string(),
        Some("tests".to_string()),
    )
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Insert or replace a user.
    pub fn put(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// In-memory [`PostStore`].
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: Mutex<HashMap<Uuid, Post>>,
}

impl MemoryPostStore {
    /// Insert or replace a post.
    pub fn put(&self, post: Post) {
        self.posts.lock().unwrap().insert(post.id, post);
    }

    /// Remove a post, simulating deletion after a share was issued.
    pub fn remove(&self, id: Uuid) {
        self.posts.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn find_recent_by_author(&self, author_id: Uuid, limit: i64) -> AppResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }
}

/// In-memory [`ShareTokenStore`]. A single mutex makes every operation
/// atomic, matching the conditional-update guarantee of the SQL store.
#[derive(Debug, Default)]
pub struct MemoryShareTokenStore {
    tokens: Mutex<HashMap<String, ShareToken>>,
}

impl MemoryShareTokenStore {
    /// Direct snapshot of a stored token.
    pub fn get(&self, token: &str) -> Option<ShareToken> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    /// Rewrite a token's expiry, for expiry tests.
    pub fn set_expiry(&self, token: &str, expires_at: chrono::DateTime<Utc>) {
        if let Some(record) = self.tokens.lock().unwrap().get_mut(token) {
            record.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl ShareTokenStore for MemoryShareTokenStore {
    async fn insert(&self, data: &NewShareToken) -> AppResult<ShareToken> {
        let record = ShareToken {
            id: Uuid::new_v4(),
            token: data.token.clone(),
            resource_type: data.resource_type,
            resource_id: data.resource_id,
            created_by: data.created_by,
            expires_at: data.expires_at,
            access_count: 0,
            max_access: data.max_access,
            is_active: true,
            ip_addresses: vec![],
            user_agents: vec![],
            created_at: next_instant(),
            last_accessed_at: None,
        };
        self.tokens
            .lock()
            .unwrap()
            .insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareToken>> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn claim_access(
        &self,
        token: &str,
        ip: &str,
        user_agent: Option<&str>,
    ) -> AppResult<Option<ShareToken>> {
        let mut tokens = self.tokens.lock().unwrap();
        let Some(record) = tokens.get_mut(token) else {
            return Ok(None);
        };

        let usable = record.is_active
            && !record.is_expired(Utc::now())
            && !record.limit_reached();
        if !usable {
            return Ok(None);
        }

        record.access_count += 1;
        record.last_accessed_at = Some(Utc::now());
        if !record.ip_addresses.iter().any(|known| known == ip) {
            record.ip_addresses.push(ip.to_string());
        }
        if let Some(agent) = user_agent {
            if !record.user_agents.iter().any(|known| known == agent) {
                record.user_agents.push(agent.to_string());
            }
        }

        Ok(Some(record.clone()))
    }

    async fn deactivate(&self, token: &str) -> AppResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get_mut(token) {
            Some(record) => {
                record.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<ShareToken>> {
        let mut shares: Vec<ShareToken> = self
            .tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.created_by == user_id)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        let now = Utc::now();
        tokens.retain(|_, t| !t.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}
