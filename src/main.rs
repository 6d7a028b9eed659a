//! Campus Helper - issue reporting chat assistant
//!
//! A Rust backend hosting the report dialogue state machine behind a small
//! HTTP API for the campus help portal's chat widget.

mod api;
mod config;
mod dialogue;
mod runtime;

use api::{create_router, AppState};
use config::Config;
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_helper=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env();
    tracing::info!(
        base_path = %config.base_path,
        reply_delay = ?config.pacing.reply_delay,
        greeting_delay = ?config.pacing.greeting_delay,
        session_ttl = ?config.session_ttl,
        "Configuration loaded"
    );

    // Create application state
    let sessions = Arc::new(SessionManager::new(config.pacing));
    SessionManager::spawn_idle_sweep(&sessions, config.session_ttl);
    let state = AppState::new(sessions, &config.base_path)?;

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state, &config.base_path)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, base_path = %config.base_path, "Campus helper listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
