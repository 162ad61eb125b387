//! Health check route, mounted at the root (not under `/api/v1`).

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Routes mounted at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Liveness probe. Returns 200 as long as the process is serving.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
