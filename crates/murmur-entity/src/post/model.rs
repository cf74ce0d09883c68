//! Post entity model.
//!
//! Likes and comments live inside the post row as JSONB documents, so a
//! post is read and written as one unit the way the rest of the store
//! treats documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A text and/or image post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Author's user ID.
    pub author_id: Uuid,
    /// Author's username at posting time (denormalized for feed rendering).
    pub username: String,
    /// Post body text.
    pub text: Option<String>,
    /// Image URL.
    pub image_url: Option<String>,
    /// Users who liked this post.
    pub likes: Json<Vec<Like>>,
    /// Comment thread.
    pub comments: Json<Vec<Comment>>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Index of the given user's like, if present.
    pub fn like_index(&self, user_id: Uuid) -> Option<usize> {
        self.likes.0.iter().position(|l| l.user_id == user_id)
    }

    /// Find a comment by ID.
    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.0.iter_mut().find(|c| c.id == comment_id)
    }
}

/// A single like on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    /// Liking user's ID.
    pub user_id: Uuid,
    /// Liking user's username.
    pub username: String,
}

/// A comment on a post, with its own likes and replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    pub id: Uuid,
    /// Commenting user's ID.
    pub user_id: Uuid,
    /// Commenting user's username.
    pub username: String,
    /// Commenting user's avatar.
    pub avatar: Option<String>,
    /// Comment text.
    pub text: String,
    /// IDs of users who liked this comment.
    pub likes: Vec<Uuid>,
    /// Replies to this comment.
    pub replies: Vec<Reply>,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// A reply to a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Replying user's ID.
    pub user_id: Uuid,
    /// Replying user's username.
    pub username: String,
    /// Replying user's avatar.
    pub avatar: Option<String>,
    /// Reply text.
    pub text: String,
    /// When the reply was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// Author's user ID.
    pub author_id: Uuid,
    /// Author's username.
    pub username: String,
    /// Post text.
    pub text: Option<String>,
    /// Image URL.
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            username: "alice".to_string(),
            text: Some("first post".to_string()),
            image_url: None,
            likes: Json(vec![]),
            comments: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_like_index_finds_user() {
        let author = Uuid::new_v4();
        let liker = Uuid::new_v4();
        let mut post = sample_post(author);
        post.likes.0.push(Like {
            user_id: liker,
            username: "bob".to_string(),
        });

        assert_eq!(post.like_index(liker), Some(0));
        assert_eq!(post.like_index(author), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let post = sample_post(Uuid::new_v4());
        let json = serde_json::to_value(&post).expect("serialize");
        assert!(json.get("authorId").is_some());
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
