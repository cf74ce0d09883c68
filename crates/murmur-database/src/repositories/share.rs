//! Share token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use murmur_core::error::{AppError, ErrorKind};
use murmur_core::result::AppResult;
use murmur_entity::share::{NewShareToken, ShareToken};

use crate::store::ShareTokenStore;

/// Repository for share token persistence and the atomic access claim.
#[derive(Debug, Clone)]
pub struct ShareTokenRepository {
    pool: PgPool,
}

impl ShareTokenRepository {
    /// Create a new share token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareTokenStore for ShareTokenRepository {
    async fn insert(&self, data: &NewShareToken) -> AppResult<ShareToken> {
        sqlx::query_as::<_, ShareToken>(
            "INSERT INTO share_tokens \
             (token, resource_type, resource_id, created_by, expires_at, max_access) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.token)
        .bind(data.resource_type)
        .bind(data.resource_id)
        .bind(data.created_by)
        .bind(data.expires_at)
        .bind(data.max_access)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share token", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareToken>> {
        sqlx::query_as::<_, ShareToken>("SELECT * FROM share_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share token", e))
    }

    // The guard conditions and the counter increment are one statement,
    // so a token with a single remaining slot admits exactly one of any
    // number of concurrent claims.
    async fn claim_access(
        &self,
        token: &str,
        ip: &str,
        user_agent: Option<&str>,
    ) -> AppResult<Option<ShareToken>> {
        sqlx::query_as::<_, ShareToken>(
            "UPDATE share_tokens SET \
                access_count = access_count + 1, \
                last_accessed_at = NOW(), \
                ip_addresses = CASE WHEN $2 = ANY(ip_addresses) \
                    THEN ip_addresses ELSE array_append(ip_addresses, $2) END, \
                user_agents = CASE WHEN $3::text IS NULL OR $3 = ANY(user_agents) \
                    THEN user_agents ELSE array_append(user_agents, $3) END \
             WHERE token = $1 \
               AND is_active = TRUE \
               AND expires_at > NOW() \
               AND (max_access IS NULL OR access_count < max_access) \
             RETURNING *",
        )
        .bind(token)
        .bind(ip)
        .bind(user_agent)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim share access", e))
    }

    async fn deactivate(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE share_tokens SET is_active = FALSE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate share token", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<ShareToken>> {
        sqlx::query_as::<_, ShareToken>(
            "SELECT * FROM share_tokens WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share tokens", e))
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM share_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired tokens", e)
            })?;
        Ok(result.rows_affected())
    }
}
