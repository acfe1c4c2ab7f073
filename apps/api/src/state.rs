use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use crate::analysis::provider::ResumeAnalyzer;
use crate::config::Config;
use crate::rate_limit::FixedWindowLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once at startup and immutable afterwards; requests share nothing
/// else in memory.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub analyzer: Arc<ResumeAnalyzer>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
    pub config: Config,
    /// Process start, for the health endpoint's uptime field.
    pub started_at: Instant,
}
