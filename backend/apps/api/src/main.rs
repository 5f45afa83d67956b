//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assessment::infra::postgres::PgAssessmentRepository;
use assessment::presentation::router::assessment_router;
use auth::application::config::AuthConfig;
use auth::infra::postgres::PgUserRepository;
use auth::presentation::router::auth_router_generic;
use catalog::infra::postgres::PgCatalogRepository;
use catalog::infra::video::ConfiguredVideoHost;
use catalog::presentation::router::catalog_router;
use community::infra::postgres::PgCommunityRepository;
use community::presentation::router::community_router;
use platform::rate_limit::MemoryRateLimiter;
use platform::token::TokenConfig;
use platform::upload::UPLOAD_ROUTES;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,assessment=info,community=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, secrets come from the environment, base64-encoded
        let access = decode_secret("JWT_ACCESS_SECRET")?;
        let refresh = decode_secret("JWT_REFRESH_SECRET")?;
        let pepper = env::var("PASSWORD_PEPPER")
            .ok()
            .map(|b64| Engine::decode(&general_purpose::STANDARD, &b64))
            .transpose()?;

        AuthConfig::new(TokenConfig::new(access, refresh), true).with_pepper(pepper)
    };
    let auth_config = Arc::new(auth_config);

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let limiter = Arc::new(MemoryRateLimiter::new());
    let video_host = ConfiguredVideoHost::from_env();

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let api = Router::new()
        .route("/health", get(health))
        .route("/uploads", get(upload_routes))
        .merge(auth_router_generic(
            users.clone(),
            auth_config.clone(),
            limiter,
        ))
        .merge(catalog_router(
            PgCatalogRepository::new(pool.clone()),
            video_host,
            users.clone(),
            auth_config.clone(),
        ))
        .merge(assessment_router(
            PgAssessmentRepository::new(pool.clone()),
            users.clone(),
            auth_config.clone(),
        ))
        .merge(community_router(
            PgCommunityRepository::new(pool.clone()),
            users,
            auth_config,
        ));

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn decode_secret(var: &str) -> anyhow::Result<Vec<u8>> {
    let b64 = env::var(var).map_err(|_| anyhow::anyhow!("{var} must be set in production"))?;
    Ok(Engine::decode(&general_purpose::STANDARD, &b64)?)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Upload constraints per content category, for client-side validation
async fn upload_routes() -> Json<&'static [platform::upload::UploadRoute]> {
    Json(UPLOAD_ROUTES)
}
