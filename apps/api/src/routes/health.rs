use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Reports environment, uptime, and a live database ping.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "success",
        "environment": state.config.environment,
        "uptime": format!("{}s", state.started_at.elapsed().as_secs()),
        "timestamp": Utc::now().to_rfc3339(),
        "database": database,
    }))
}
