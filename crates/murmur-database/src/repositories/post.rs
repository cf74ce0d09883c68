//! Post repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use murmur_core::error::{AppError, ErrorKind};
use murmur_core::result::AppResult;
use murmur_core::types::sorting::FeedSort;
use murmur_entity::post::{CreatePost, Post};

use crate::store::PostStore;

/// Repository for post CRUD, feed, and search operations.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a post by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post by id", e))
    }

    /// Feed query with the requested ordering.
    pub async fn find_all(&self, sort: FeedSort) -> AppResult<Vec<Post>> {
        let query = match sort {
            FeedSort::Recent => "SELECT * FROM posts ORDER BY created_at DESC",
            FeedSort::Liked => {
                "SELECT * FROM posts \
                 ORDER BY jsonb_array_length(likes) DESC, created_at DESC"
            }
            FeedSort::Commented => {
                "SELECT * FROM posts \
                 ORDER BY jsonb_array_length(comments) DESC, created_at DESC"
            }
        };

        sqlx::query_as::<_, Post>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))
    }

    /// All posts by an author, newest first.
    pub async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list author posts", e))
    }

    /// The author's most recent posts, newest first, at most `limit`.
    pub async fn find_recent_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list recent posts", e))
    }

    /// Case-insensitive search over post text and author username.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Post>> {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE text ILIKE $1 OR username ILIKE $1 \
             ORDER BY created_at DESC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search posts", e))
    }

    /// Create a new post.
    pub async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (author_id, username, text, image_url) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.author_id)
        .bind(&data.username)
        .bind(&data.text)
        .bind(&data.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    /// Persist mutated like/comment documents.
    pub async fn save_engagement(&self, post: &Post) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET likes = $2, comments = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(post.id)
        .bind(&post.likes)
        .bind(&post.comments)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        PostRepository::find_by_id(self, id).await
    }

    async fn find_recent_by_author(&self, author_id: Uuid, limit: i64) -> AppResult<Vec<Post>> {
        PostRepository::find_recent_by_author(self, author_id, limit).await
    }
}
