//! Auth handlers — signup, login, refresh, me.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use murmur_core::error::AppError;
use murmur_entity::user::User;

use crate::dto::request::{LoginRequest, RefreshRequest, SignupRequest};
use crate::dto::response::AuthResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let result = state
        .user_service
        .signup(&req.username, &req.email, &req.password)
        .await?;

    Ok(Json(auth_response(result.user, result.tokens)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let result = state.user_service.login(&req.email, &req.password).await?;

    Ok(Json(auth_response(result.user, result.tokens)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let result = state.user_service.refresh(&req.refresh_token).await?;
    Ok(Json(auth_response(result.user, result.tokens)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state.user_service.me(auth.context()).await?;
    Ok(Json(user))
}

fn auth_response(user: User, tokens: murmur_auth::jwt::TokenPair) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_at: tokens.access_expires_at,
        user,
    }
}
