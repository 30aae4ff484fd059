//! Price store gateway.
//!
//! The ingestion pipeline and the read API only talk to storage through
//! [`PriceStore`], so the PostgreSQL implementation can be swapped for the
//! in-memory double in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{PriceQuery, PriceRecord, SortKey, SortOrder};

pub mod postgres;
#[cfg(test)]
pub mod memory;

pub use postgres::PgPriceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[allow(dead_code)]
    #[error("store rejected request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn select(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, StoreError>;

    /// Removes every row stamped with `date`, returning how many went away.
    async fn delete_by_date(&self, date: NaiveDate) -> Result<u64, StoreError>;

    async fn insert_many(&self, records: &[PriceRecord]) -> Result<u64, StoreError>;

    /// Swap the rows for `date` with `records`.
    ///
    /// The default runs delete then insert as two separate calls: a failed
    /// insert leaves the date empty. Stores with transactions override this.
    async fn replace_for_date(
        &self,
        date: NaiveDate,
        records: &[PriceRecord],
    ) -> Result<u64, StoreError> {
        self.delete_by_date(date).await?;
        self.insert_many(records).await
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        let query = PriceQuery::default()
            .sorted(SortKey::Date, SortOrder::Descending)
            .limit(1);
        let rows = self.select(&query).await?;
        Ok(rows.first().map(|r| r.date))
    }
}
