//! Tripline Trip API
//!
//! Trip-planning collaboration backend for a Telegram Mini App.
//!
//! ## Endpoints
//!
//! - `POST /api/telegram/validate` - Verify a launch payload (unauthenticated)
//! - `GET /api/me` - Profile of the authenticated user
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//!
//! All `/api` routes except the validation endpoint require a Telegram
//! launch payload in the `X-Telegram-Init-Data` header (or the `initData`
//! query parameter).

mod config;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tripline_db::pg::Repositories;

use crate::config::Config;
use crate::middleware::TelegramAuthLayer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("trip_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tripline Trip API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        dev_mode = config.dev_mode,
        has_bot_secret = config.auth.bot_secret.is_some(),
        "Configuration loaded"
    );

    if config.dev_mode {
        tracing::warn!("Development mode: launch payloads are NOT verified");
    }

    // Create database pool
    let pool = tripline_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories and application state
    let repos = Repositories::new(pool.clone());
    let state = AppState::new(repos, pool, config.clone());

    // Build HTTP router
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    // API routes; everything here except the validation endpoint sits behind
    // the auth middleware (the allowlist handles the exception).
    let api = Router::new()
        .route("/telegram/validate", post(handlers::validate_init_data))
        .route("/me", get(handlers::me));

    // Health routes bypass the auth allowlist anyway, but keep them outside
    // the middleware stack so probes never pay for CORS or tracing.
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Permissive CORS: the Mini App is served from Telegram's origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Authentication (innermost - closest to handlers)
        .layer(TelegramAuthLayer::new(state.clone()));

    Router::new()
        .nest("/api", api)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
