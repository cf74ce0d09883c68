//! Token share handlers — create, public access, revoke, and listing.

use axum::Json;
use axum::extract::{Path, State};

use murmur_core::error::AppError;
use murmur_entity::share::{ResourceType, ShareToken};
use murmur_service::share::service::CreateShareRequest as SvcCreateShare;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::{CreateShareResponse, MessageResponse, SharedResourceResponse};
use crate::extractors::{AuthUser, ClientMeta};
use crate::state::AppState;

/// POST /api/share/create
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<Json<CreateShareResponse>, AppError> {
    let resource_type: ResourceType = req.resource_type.parse()?;

    let created = state
        .share_service
        .create_share(
            auth.context(),
            SvcCreateShare {
                resource_type,
                resource_id: req.resource_id,
                expires_in_days: req.expires_in_days,
                max_access: req.max_access,
            },
        )
        .await?;

    Ok(Json(CreateShareResponse {
        success: true,
        share_url: created.share_url,
        token: created.token,
        expires_at: created.expires_at,
        max_access: created.max_access,
    }))
}

/// GET /api/share/{token} — public, no auth
pub async fn resolve_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    meta: ClientMeta,
) -> Result<Json<SharedResourceResponse>, AppError> {
    let shared = state
        .share_service
        .resolve_share(&token, &meta.ip_address, meta.user_agent.as_deref())
        .await?;

    Ok(Json(SharedResourceResponse {
        resource: shared.resource,
        access_count: shared.access_count,
        expires_at: shared.expires_at,
    }))
}

/// DELETE /api/share/{token}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .share_service
        .revoke_share(auth.context(), &token)
        .await?;

    Ok(Json(MessageResponse {
        msg: "Share link revoked successfully".to_string(),
    }))
}

/// GET /api/share/mine
pub async fn my_shares(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ShareToken>>, AppError> {
    let shares = state.share_service.list_shares(auth.context()).await?;
    Ok(Json(shares))
}
