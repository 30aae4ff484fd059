use tracing::info;

use crate::errors::AppError;
use crate::services::job_scheduler_service::{JobContext, JobResult};

/// Daily download of the published price workbook.
///
/// Runs the ingest pipeline for today's date in the configured time zone.
/// A failed run is reported as a job error and picked up again by the next
/// scheduled tick or a manual trigger; nothing is retried here.
pub async fn ingest_vegetable_prices(ctx: JobContext) -> Result<JobResult, AppError> {
    info!("🥕 Scheduled vegetable price ingest");

    let outcome = ctx.pipeline.run().await;

    if outcome.success {
        Ok(JobResult {
            items_processed: outcome.count,
            items_skipped: outcome.skipped,
        })
    } else {
        Err(AppError::External(
            outcome.error.unwrap_or_else(|| "ingest failed".to_string()),
        ))
    }
}
