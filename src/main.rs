//! Murmur Server — social platform backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use murmur_core::config::AppConfig;
use murmur_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("MURMUR_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Murmur v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = murmur_database::connection::create_pool(&config.database).await?;
    murmur_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let user_repo = Arc::new(murmur_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let post_repo = Arc::new(murmur_database::repositories::post::PostRepository::new(
        db_pool.clone(),
    ));
    let share_repo = Arc::new(
        murmur_database::repositories::share::ShareTokenRepository::new(db_pool.clone()),
    );

    // ── Step 3: Auth primitives ──────────────────────────────────
    let password_hasher = Arc::new(murmur_auth::password::hasher::PasswordHasher::new());
    let password_validator = Arc::new(murmur_auth::password::validator::PasswordValidator::new(
        &config.auth,
    ));
    let jwt_encoder = Arc::new(murmur_auth::jwt::encoder::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(murmur_auth::jwt::decoder::JwtDecoder::new(&config.auth));

    // ── Step 4: Services ─────────────────────────────────────────
    let resource_accessor = Arc::new(murmur_service::resource::accessor::ResourceAccessor::new(
        user_repo.clone(),
        post_repo.clone(),
        config.share.profile_posts_limit,
    ));
    let share_service = Arc::new(murmur_service::share::service::ShareService::new(
        share_repo.clone(),
        Arc::clone(&resource_accessor),
        murmur_service::share::link::LinkService::new(),
        config.share.clone(),
    ));
    let hash_codec = Arc::new(murmur_service::secure::codec::HashCodec::new(
        &config.share.hash_secret,
    ));
    let secure_share_service = Arc::new(murmur_service::secure::service::SecureShareService::new(
        hash_codec,
        Arc::clone(&resource_accessor),
        config.share.clone(),
    ));
    let user_service = Arc::new(murmur_service::user::service::UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&post_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));
    let post_service = Arc::new(murmur_service::post::service::PostService::new(
        Arc::clone(&post_repo),
        Arc::clone(&user_repo),
    ));

    // ── Step 5: Expired-token sweep ──────────────────────────────
    // Lazy expiry at resolve time is the correctness mechanism; this
    // sweep only reclaims storage for long-dead tokens.
    if config.share.sweep_interval_seconds > 0 {
        let sweep_repo = Arc::clone(&share_repo);
        let interval = Duration::from_secs(config.share.sweep_interval_seconds);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                use murmur_database::store::ShareTokenStore;
                match sweep_repo.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => tracing::info!(purged, "Purged expired share tokens"),
                    Err(e) => tracing::warn!("Share token sweep failed: {}", e),
                }
            }
        });
    }

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = murmur_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_encoder,
        jwt_decoder,
        password_hasher,
        user_repo,
        post_repo,
        share_repo,
        resource_accessor,
        share_service,
        secure_share_service,
        user_service,
        post_service,
    };

    let app = murmur_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Murmur server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    db_pool.close().await;
    tracing::info!("Murmur server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
