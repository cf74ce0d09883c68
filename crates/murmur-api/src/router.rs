//! Route definitions for the Murmur HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(share_routes())
        .merge(secure_share_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: signup, login, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// User profile and follow-graph endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", put(handlers::user::update_profile))
        .route("/users/follow/{id}", post(handlers::user::follow_toggle))
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/followers", get(handlers::user::followers))
        .route("/users/{id}/following", get(handlers::user::following))
}

/// Post, feed, and engagement endpoints
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::post::create_post))
        .route("/posts", get(handlers::post::feed))
        .route("/posts/search", get(handlers::post::search))
        .route("/posts/{id}", get(handlers::post::get_post))
        .route("/posts/{id}", delete(handlers::post::delete_post))
        .route("/posts/like/{id}", put(handlers::post::like_toggle))
        .route("/posts/comment/{id}", post(handlers::post::add_comment))
        .route(
            "/posts/comment/{id}/{comment_id}/like",
            put(handlers::post::comment_like_toggle),
        )
        .route(
            "/posts/comment/{id}/{comment_id}/reply",
            post(handlers::post::add_reply),
        )
}

/// Token share endpoints; resolution is public
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share/create", post(handlers::share::create_share))
        .route("/share/mine", get(handlers::share::my_shares))
        .route("/share/{token}", get(handlers::share::resolve_share))
        .route("/share/{token}", delete(handlers::share::revoke_share))
}

/// Encrypted-hash share endpoints; resolution is public
fn secure_share_routes() -> Router<AppState> {
    Router::new()
        .route("/secure-share/post", post(handlers::secure_share::share_post))
        .route("/secure-share/user", post(handlers::secure_share::share_user))
        .route(
            "/secure-share/{hash}",
            get(handlers::secure_share::resolve_hash),
        )
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
