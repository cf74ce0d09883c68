//! Post service — feed queries and the engagement documents.
//!
//! Likes, comments, and replies are documents embedded in the post row;
//! mutations load the post, edit the document in memory, and persist it
//! back as a unit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use murmur_core::error::AppError;
use murmur_core::result::AppResult;
use murmur_core::types::sorting::FeedSort;
use murmur_database::repositories::post::PostRepository;
use murmur_database::repositories::user::UserRepository;
use murmur_entity::post::{Comment, CreatePost, Like, Post, Reply};
use murmur_entity::user::PublicUserProfile;

use crate::context::RequestContext;
use crate::resource::PostView;

/// Handles posts and their engagement documents.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Post repository.
    posts: Arc<PostRepository>,
    /// User repository (author profiles, commenter avatars).
    users: Arc<UserRepository>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(posts: Arc<PostRepository>, users: Arc<UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Creates a post. At least one of text and image is required.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        text: Option<String>,
        image_url: Option<String>,
    ) -> AppResult<Post> {
        let text = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        if text.is_none() && image_url.is_none() {
            return Err(AppError::validation("Please provide text or an image"));
        }

        let post = self
            .posts
            .create(&CreatePost {
                author_id: ctx.user_id,
                username: ctx.username.clone(),
                text,
                image_url,
            })
            .await?;

        info!(user_id = %ctx.user_id, post_id = %post.id, "Post created");
        Ok(post)
    }

    /// The public feed with the requested ordering, authors attached.
    pub async fn feed(&self, sort: FeedSort) -> AppResult<Vec<PostView>> {
        let posts = self.posts.find_all(sort).await?;
        self.attach_authors(posts).await
    }

    /// Case-insensitive search over text and author username.
    pub async fn search(&self, query: &str) -> AppResult<Vec<PostView>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let posts = self.posts.search(query.trim()).await?;
        self.attach_authors(posts).await
    }

    /// A single post with its author.
    pub async fn get_post(&self, post_id: Uuid) -> AppResult<PostView> {
        let post = self.require_post(post_id).await?;
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .as_ref()
            .map(PublicUserProfile::from);
        Ok(PostView { post, author })
    }

    /// Deletes a post. Author only.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let post = self.require_post(post_id).await?;
        if post.author_id != ctx.user_id {
            return Err(AppError::forbidden("User not authorized"));
        }

        self.posts.delete(post_id).await?;
        info!(user_id = %ctx.user_id, post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Likes or unlikes a post, toggling on current state.
    pub async fn like_toggle(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<Vec<Like>> {
        let mut post = self.require_post(post_id).await?;

        match post.like_index(ctx.user_id) {
            Some(index) => {
                post.likes.0.remove(index);
            }
            None => post.likes.0.insert(
                0,
                Like {
                    user_id: ctx.user_id,
                    username: ctx.username.clone(),
                },
            ),
        }

        let saved = self.posts.save_engagement(&post).await?;
        Ok(saved.likes.0)
    }

    /// Adds a comment. Returns the updated comment thread.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: &str,
    ) -> AppResult<Vec<Comment>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment text is required"));
        }

        let mut post = self.require_post(post_id).await?;
        let avatar = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .and_then(|u| u.avatar);

        post.comments.0.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                user_id: ctx.user_id,
                username: ctx.username.clone(),
                avatar,
                text: text.to_string(),
                likes: Vec::new(),
                replies: Vec::new(),
                created_at: Utc::now(),
            },
        );

        let saved = self.posts.save_engagement(&post).await?;
        Ok(saved.comments.0)
    }

    /// Likes or unlikes a comment, toggling on current state.
    pub async fn comment_like_toggle(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> AppResult<Vec<Comment>> {
        let mut post = self.require_post(post_id).await?;

        let comment = post
            .comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        match comment.likes.iter().position(|id| *id == ctx.user_id) {
            Some(index) => {
                comment.likes.remove(index);
            }
            None => comment.likes.push(ctx.user_id),
        }

        let saved = self.posts.save_engagement(&post).await?;
        Ok(saved.comments.0)
    }

    /// Replies to a comment. Returns the updated comment thread.
    pub async fn add_reply(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> AppResult<Vec<Comment>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Reply text is required"));
        }

        let mut post = self.require_post(post_id).await?;
        let avatar = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .and_then(|u| u.avatar);

        let comment = post
            .comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        comment.replies.push(Reply {
            user_id: ctx.user_id,
            username: ctx.username.clone(),
            avatar,
            text: text.to_string(),
            created_at: Utc::now(),
        });

        let saved = self.posts.save_engagement(&post).await?;
        Ok(saved.comments.0)
    }

    async fn require_post(&self, post_id: Uuid) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Batch-attach author profiles to avoid a lookup per post.
    async fn attach_authors(&self, posts: Vec<Post>) -> AppResult<Vec<PostView>> {
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, PublicUserProfile> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, PublicUserProfile::from(u)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                PostView { post, author }
            })
            .collect())
    }
}
