//! User handlers — profile editing, follows, and public profile pages.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use murmur_core::error::AppError;
use murmur_entity::user::{PublicUserProfile, UpdateProfile, User};
use murmur_service::user::service::{FollowChange, ProfileWithPosts};

use crate::dto::request::UpdateProfileRequest;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service
        .update_profile(
            auth.context(),
            UpdateProfile {
                username: req.username,
                bio: req.bio,
                avatar: req.avatar,
            },
        )
        .await?;

    Ok(Json(user))
}

/// POST /api/users/follow/{id}
pub async fn follow_toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowChange>, AppError> {
    let change = state.user_service.follow_toggle(auth.context(), id).await?;
    Ok(Json(change))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileWithPosts>, AppError> {
    let profile = state.user_service.profile_with_posts(id).await?;
    Ok(Json(profile))
}

/// GET /api/users/{id}/followers
pub async fn followers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PublicUserProfile>>, AppError> {
    let profiles = state.user_service.followers(id).await?;
    Ok(Json(profiles))
}

/// GET /api/users/{id}/following
pub async fn following(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PublicUserProfile>>, AppError> {
    let profiles = state.user_service.following(id).await?;
    Ok(Json(profiles))
}
