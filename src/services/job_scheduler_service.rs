use crate::errors::AppError;
use crate::jobs::ingest_prices_job;
use crate::services::ingest_service::IngestPipeline;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

// Context passed to job functions
#[derive(Clone)]
pub struct JobContext {
    pub pipeline: Arc<IngestPipeline>,
}

#[derive(Debug)]
pub struct JobResult {
    pub items_processed: usize,
    pub items_skipped: usize,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
    timezone: Tz,
}

impl JobSchedulerService {
    pub async fn new(pipeline: Arc<IngestPipeline>, timezone: Tz) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            context: JobContext { pipeline },
            timezone,
        })
    }

    /// Register the daily ingest and start ticking.
    pub async fn start(&mut self, ingest_schedule: &str) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        // format: sec min hour day month weekday
        self.schedule_job(
            ingest_schedule,
            "ingest_vegetable_prices",
            ingest_prices_job::ingest_vegetable_prices,
        )
        .await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("✅ Job scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    pub async fn stop(&mut self) -> Result<(), AppError> {
        info!("🛑 Stopping job scheduler...");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::External(format!("Failed to stop scheduler: {}", e)))?;
        info!("✅ Job scheduler stopped");
        Ok(())
    }

    async fn schedule_job<F, Fut>(
        &mut self,
        schedule: &str,
        job_name: &'static str,
        job_fn: F,
    ) -> Result<(), AppError>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<JobResult, AppError>> + Send + 'static,
    {
        let context = self.context.clone();
        let job_fn = Arc::new(job_fn);

        let job = Job::new_async_tz(schedule, self.timezone, move |_uuid, _l| {
            let context = context.clone();
            let job_fn = job_fn.clone();
            Box::pin(async move {
                execute_job_with_tracking(job_name, context, job_fn).await;
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create job {}: {}", job_name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add job {}: {}", job_name, e)))?;

        info!("📅 Scheduled: {} [cron: {} {}]", job_name, schedule, self.timezone);
        Ok(())
    }
}

async fn execute_job_with_tracking<F, Fut>(job_name: &str, context: JobContext, job_fn: Arc<F>)
where
    F: Fn(JobContext) -> Fut,
    Fut: std::future::Future<Output = Result<JobResult, AppError>>,
{
    info!("🏃 Starting job: {}", job_name);
    let started_at = Utc::now();

    let result = job_fn(context).await;

    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    match result {
        Ok(job_result) => info!(
            "✅ Job completed: {} (processed: {}, skipped: {}, duration: {}ms)",
            job_name, job_result.items_processed, job_result.items_skipped, duration_ms
        ),
        Err(e) => error!("❌ Job failed: {} - {} (duration: {}ms)", job_name, e, duration_ms),
    }
}
