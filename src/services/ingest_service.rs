use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::IngestError;
use crate::external::workbook_source::{FetchError, WorkbookSource};
use crate::models::{Extraction, IngestOutcome};
use crate::services::row_extractor::{self, ExtractionLayout};
use crate::services::run_guard::RunGuard;
#[cfg(test)]
use crate::services::run_guard::RunPermit;
use crate::services::sheet_locator::{ParsedWorkbook, SheetLocator};
use crate::store::PriceStore;

/// Fetch → locate sheet → extract → replace, for one date at a time.
pub struct IngestPipeline {
    source: Arc<dyn WorkbookSource>,
    store: Arc<dyn PriceStore>,
    locator: SheetLocator,
    layout: ExtractionLayout,
    timezone: Tz,
    guard: RunGuard,
}

impl IngestPipeline {
    pub fn new(
        source: Arc<dyn WorkbookSource>,
        store: Arc<dyn PriceStore>,
        locator: SheetLocator,
        timezone: Tz,
    ) -> Self {
        Self {
            source,
            store,
            locator,
            layout: ExtractionLayout::default(),
            timezone,
            guard: RunGuard::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_layout(mut self, layout: ExtractionLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Calendar date in the configured time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Marks `date` as busy, as if a run were in flight.
    #[cfg(test)]
    pub fn hold_date(&self, date: NaiveDate) -> Option<RunPermit> {
        self.guard.try_acquire(date)
    }

    pub async fn run(&self) -> IngestOutcome {
        self.run_for_date(self.today()).await
    }

    /// Runs the whole pipeline for `date`. Never fails: problems are logged
    /// and reported through the outcome.
    pub async fn run_for_date(&self, date: NaiveDate) -> IngestOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("ingest_run", %run_id, %date);

        async move {
            let Some(_permit) = self.guard.try_acquire(date) else {
                warn!("⏳ Ingest for {} already running, ignoring trigger", date);
                return IngestOutcome::rejected(date, IngestError::RunInProgress(date));
            };

            info!("🥬 Starting price ingest for {}", date);
            match self.execute(date).await {
                Ok((written, skipped)) => {
                    info!("✅ Ingest for {} stored {} records ({} rows skipped)", date, written, skipped);
                    IngestOutcome::succeeded(date, written, skipped)
                }
                Err(e) => {
                    self.log_failure(date, &e);
                    IngestOutcome::failed(date, e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, date: NaiveDate) -> Result<(usize, usize), IngestError> {
        let bytes = self.source.fetch(date).await?;

        // The workbook is only needed to read cells; keep it out of the
        // future's state across the store call.
        let extraction = self.extract(bytes, date)?;
        let skipped = extraction.skipped;

        if extraction.records.is_empty() {
            info!("No price rows found for {}, leaving stored data untouched", date);
            return Ok((0, skipped));
        }

        let count = extraction.records.len();
        self.store.replace_for_date(date, &extraction.records).await?;

        Ok((count, skipped))
    }

    fn extract(&self, bytes: Vec<u8>, date: NaiveDate) -> Result<Extraction, IngestError> {
        let mut workbook = ParsedWorkbook::from_bytes(bytes)?;
        let range = self.locator.locate(&mut workbook, date)?;
        Ok(row_extractor::extract(&range, &self.layout, date))
    }

    fn log_failure(&self, date: NaiveDate, e: &IngestError) {
        match e {
            IngestError::Fetch(FetchError::Timeout { url }) => {
                error!("❌ Timed out downloading {} for {}", url, date)
            }
            IngestError::Fetch(fe) => {
                error!("❌ Could not download {} for {}: {}", fe.url(), date, fe)
            }
            IngestError::SheetNotFound { expected, available } => error!(
                "❌ Worksheet '{}' missing for {} in {} (sheets: {})",
                expected,
                date,
                self.source.locate(date),
                available
            ),
            IngestError::Parse(msg) => {
                error!("❌ Unreadable workbook {}: {}", self.source.locate(date), msg)
            }
            IngestError::Store(se) => error!("❌ Failed to store prices for {}: {}", date, se),
            IngestError::RunInProgress(_) => warn!("{}", e),
        }
    }
}
