use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(trigger_ingest))
}

#[derive(Debug, Deserialize)]
pub struct TriggerParams {
    /// Backfill a specific day instead of today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub status: &'static str,
    pub message: String,
    pub error: Option<String>,
    pub date: NaiveDate,
    pub count: usize,
    pub skipped: usize,
    pub timestamp: String,
}

/// POST /api/scrape - run the ingest pipeline now and wait for it
pub async fn trigger_ingest(
    State(state): State<AppState>,
    params: Result<Query<TriggerParams>, QueryRejection>,
) -> Result<(StatusCode, Json<TriggerResponse>), AppError> {
    let Query(params) = params?;
    let date = params.date.unwrap_or_else(|| state.pipeline.today());
    info!("POST /api/scrape - Manual ingest for {}", date);

    let outcome = state.pipeline.run_for_date(date).await;

    let (status, body) = if outcome.success {
        (
            StatusCode::OK,
            TriggerResponse {
                status: "success",
                message: format!("Stored {} prices for {}", outcome.count, outcome.date),
                error: None,
                date: outcome.date,
                count: outcome.count,
                skipped: outcome.skipped,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    } else if outcome.already_running {
        warn!("Manual ingest for {} rejected, a run is already in flight", date);
        (
            StatusCode::CONFLICT,
            TriggerResponse {
                status: "error",
                message: format!("Price ingest for {} is already running", outcome.date),
                error: outcome.error,
                date: outcome.date,
                count: 0,
                skipped: 0,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    } else {
        warn!("Manual ingest for {} failed: {:?}", date, outcome.error);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            TriggerResponse {
                status: "error",
                message: format!("Price ingest for {} failed", outcome.date),
                error: outcome.error,
                date: outcome.date,
                count: 0,
                skipped: outcome.skipped,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    };

    Ok((status, Json(body)))
}
