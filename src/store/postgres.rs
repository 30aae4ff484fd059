use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::price_queries;
use crate::models::{PriceQuery, PriceRecord};
use crate::store::{PriceStore, StoreError};

#[derive(Clone)]
pub struct PgPriceStore {
    pool: PgPool,
}

impl PgPriceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn select(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, StoreError> {
        Ok(price_queries::fetch(&self.pool, query).await?)
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        Ok(price_queries::delete_by_date(&self.pool, date).await?)
    }

    async fn insert_many(&self, records: &[PriceRecord]) -> Result<u64, StoreError> {
        Ok(price_queries::insert_many(&self.pool, records).await?)
    }

    async fn replace_for_date(
        &self,
        date: NaiveDate,
        records: &[PriceRecord],
    ) -> Result<u64, StoreError> {
        Ok(price_queries::replace_for_date(&self.pool, date, records).await?)
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(price_queries::fetch_latest_date(&self.pool).await?)
    }
}
