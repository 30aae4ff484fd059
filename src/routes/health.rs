use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    debug!("GET /api/health - Health check");
    Json(HealthResponse {
        status: "success",
        message: "API server is running!",
        timestamp: Utc::now().to_rfc3339(),
    })
}
