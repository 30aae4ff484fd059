mod app;
mod config;
mod db;
mod errors;
mod external;
mod jobs;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::external::http_workbook::HttpWorkbookSource;
use crate::logging::LoggingConfig;
use crate::services::ingest_service::IngestPipeline;
use crate::services::job_scheduler_service::JobSchedulerService;
use crate::services::sheet_locator::SheetLocator;
use crate::state::AppState;
use crate::store::{PgPriceStore, PriceStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let store: Arc<dyn PriceStore> = Arc::new(PgPriceStore::new(pool));
    let source = HttpWorkbookSource::new(config.spreadsheet_base_url.clone(), config.fetch_timeout)?;

    let pipeline = Arc::new(IngestPipeline::new(
        Arc::new(source),
        store.clone(),
        SheetLocator::new(config.sheet_names.clone()),
        config.ingest_timezone,
    ));

    let mut scheduler = JobSchedulerService::new(pipeline.clone(), config.ingest_timezone).await?;
    scheduler.start(&config.ingest_cron).await?;

    if config.ingest_on_startup {
        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            let outcome = pipeline.run().await;
            info!("Startup ingest finished: {:?}", outcome);
        });
    }

    let state = AppState { store, pipeline };
    let app = app::create_app(state, &config.cors_allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("🚀 Yasai prices backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = scheduler.stop().await {
        warn!("Scheduler did not stop cleanly: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
