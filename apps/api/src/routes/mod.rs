pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::rate_limit::rate_limit_middleware;
use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Multipart framing adds overhead beyond the file itself; the precise
    // per-file cap is enforced in the upload handler.
    let body_limit = (state.config.max_file_size_bytes() + 64 * 1024) as usize;

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/resumes", get(handlers::list_resumes))
        .route("/api/resumes/upload", post(handlers::upload_resume))
        .route(
            "/api/resumes/:id",
            get(handlers::get_resume).delete(handlers::delete_resume),
        )
        .route("/api/resumes/:id/analyze", post(handlers::analyze_resume))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "fail",
            "message": format!("Route not found: {method} {}", uri.path()),
        })),
    )
}
