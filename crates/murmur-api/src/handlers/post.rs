//! Post handlers — feed, search, and engagement.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use murmur_core::error::AppError;
use murmur_core::types::sorting::FeedSort;
use murmur_entity::post::{Comment, Like, Post};
use murmur_service::resource::PostView;

use crate::dto::request::{CommentRequest, CreatePostRequest, FeedQuery, SearchQuery};
use crate::dto::response::MessageResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let post = state
        .post_service
        .create_post(auth.context(), req.text, req.image_url)
        .await?;
    Ok(Json(post))
}

/// GET /api/posts
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let sort = FeedSort::from_query(query.sort.as_deref());
    let posts = state.post_service.feed(sort).await?;
    Ok(Json(posts))
}

/// GET /api/posts/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let posts = state
        .post_service
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostView>, AppError> {
    let post = state.post_service.get_post(id).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.post_service.delete_post(auth.context(), id).await?;
    Ok(Json(MessageResponse {
        msg: "Post removed".to_string(),
    }))
}

/// PUT /api/posts/like/{id}
pub async fn like_toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Like>>, AppError> {
    let likes = state.post_service.like_toggle(auth.context(), id).await?;
    Ok(Json(likes))
}

/// POST /api/posts/comment/{id}
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Vec<Comment>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comments = state
        .post_service
        .add_comment(auth.context(), id, &req.text)
        .await?;
    Ok(Json(comments))
}

/// PUT /api/posts/comment/{id}/{comment_id}/like
pub async fn comment_like_toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = state
        .post_service
        .comment_like_toggle(auth.context(), id, comment_id)
        .await?;
    Ok(Json(comments))
}

/// POST /api/posts/comment/{id}/{comment_id}/reply
pub async fn add_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Vec<Comment>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comments = state
        .post_service
        .add_reply(auth.context(), id, comment_id, &req.text)
        .await?;
    Ok(Json(comments))
}
