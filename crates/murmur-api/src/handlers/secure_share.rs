//! Encrypted-hash share handlers.

use axum::Json;
use axum::extract::{Path, State};

use murmur_core::error::AppError;
use murmur_service::resource::ResourceView;

use crate::dto::request::{SecureSharePostRequest, SecureShareUserRequest};
use crate::dto::response::IssuedHashResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/secure-share/post
pub async fn share_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SecureSharePostRequest>,
) -> Result<Json<IssuedHashResponse>, AppError> {
    let issued = state
        .secure_share_service
        .issue_post_share(auth.context(), req.post_id)
        .await?;

    Ok(Json(IssuedHashResponse {
        success: true,
        share_url: issued.share_url,
        hash: issued.hash,
    }))
}

/// POST /api/secure-share/user
pub async fn share_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SecureShareUserRequest>,
) -> Result<Json<IssuedHashResponse>, AppError> {
    let issued = state
        .secure_share_service
        .issue_user_share(auth.context(), req.user_id)
        .await?;

    Ok(Json(IssuedHashResponse {
        success: true,
        share_url: issued.share_url,
        hash: issued.hash,
    }))
}

/// GET /api/secure-share/{hash} — public, no auth
pub async fn resolve_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<ResourceView>, AppError> {
    let view = state.secure_share_service.resolve_hash(&hash).await?;
    Ok(Json(view))
}
