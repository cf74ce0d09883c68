//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use murmur_auth::jwt::decoder::JwtDecoder;
use murmur_auth::jwt::encoder::JwtEncoder;
use murmur_auth::password::hasher::PasswordHasher;
use murmur_core::config::AppConfig;

use murmur_database::repositories::post::PostRepository;
use murmur_database::repositories::share::ShareTokenRepository;
use murmur_database::repositories::user::UserRepository;

use murmur_service::post::service::PostService;
use murmur_service::resource::accessor::ResourceAccessor;
use murmur_service::secure::service::SecureShareService;
use murmur_service::share::service::ShareService;
use murmur_service::user::service::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Post repository
    pub post_repo: Arc<PostRepository>,
    /// Share token repository
    pub share_repo: Arc<ShareTokenRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Viewer-safe resource access
    pub resource_accessor: Arc<ResourceAccessor>,
    /// Token share manager
    pub share_service: Arc<ShareService>,
    /// Encrypted-hash share service
    pub secure_share_service: Arc<SecureShareService>,
    /// User service
    pub user_service: Arc<UserService>,
    /// Post service
    pub post_service: Arc<PostService>,
}
