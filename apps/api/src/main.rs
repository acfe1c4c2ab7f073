mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod rate_limit;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::provider::ResumeAnalyzer;
use crate::config::Config;
use crate::rate_limit::FixedWindowLimiter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    errors::set_debug_responses(config.is_development());

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.environment);

    // Uploads land here; make sure it exists before the first request.
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let pool = db::create_pool(&config.database_url).await?;
    db::ensure_schema(&pool).await?;

    let analyzer = Arc::new(ResumeAnalyzer::from_config(&config));
    info!("Analysis provider initialized: {}", analyzer.primary_name());

    let rate_limiter = Arc::new(FixedWindowLimiter::new(
        Duration::from_millis(config.rate_limit_window_ms),
        config.rate_limit_max_requests,
    ));

    let state = AppState {
        db: pool.clone(),
        analyzer,
        rate_limiter,
        config: config.clone(),
        started_at: Instant::now(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(&config)),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Health: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Database pool closed. Server terminated.");

    Ok(())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_origin == "*" {
        return cors.allow_origin(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!(
                "CORS_ORIGIN '{}' is not a valid origin; allowing any origin",
                config.cors_origin
            );
            cors.allow_origin(Any)
        }
    }
}

/// Resolves on SIGINT or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, draining in-flight requests...");
}
