use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::models::{PriceQuery, PriceRecord, SortKey, SortOrder};
use crate::store::{PriceStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Select,
    Delete(NaiveDate),
    Insert(usize),
    Replace(NaiveDate, usize),
}

/// In-memory price table with switchable failures.
///
/// In plain mode `replace_for_date` behaves like two independent remote
/// calls. In transactional mode it swaps the rows for a date all at once and
/// leaves them untouched when the insert is rejected.
#[derive(Default)]
pub struct MemoryPriceStore {
    rows: Mutex<Vec<PriceRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_delete: AtomicBool,
    fail_insert: AtomicBool,
    transactional: bool,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactional() -> Self {
        Self {
            transactional: true,
            ..Self::default()
        }
    }

    pub fn with_rows(self, rows: Vec<PriceRecord>) -> Self {
        *self.rows.lock() = rows;
        self
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<PriceRecord> {
        self.rows.lock().clone()
    }

    pub fn rows_for(&self, date: NaiveDate) -> Vec<PriceRecord> {
        self.rows.lock().iter().filter(|r| r.date == date).cloned().collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    fn check_insert(&self) -> Result<(), StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("insert rejected".to_string()));
        }
        Ok(())
    }

    fn check_delete(&self) -> Result<(), StoreError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("delete rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn select(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, StoreError> {
        self.calls.lock().push(StoreCall::Select);

        let mut rows: Vec<PriceRecord> = self
            .rows
            .lock()
            .iter()
            .filter(|r| query.date.map_or(true, |d| r.date == d))
            .filter(|r| query.name.as_ref().map_or(true, |n| &r.name == n))
            .cloned()
            .collect();

        // stable sort keeps insertion order among ties
        rows.sort_by(|a, b| {
            let ord = match query.sort_by {
                SortKey::Date => a.date.cmp(&b.date),
                SortKey::Name => a.name.cmp(&b.name),
            };
            match query.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        self.calls.lock().push(StoreCall::Delete(date));
        self.check_delete()?;

        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|r| r.date != date);
        Ok((before - rows.len()) as u64)
    }

    async fn insert_many(&self, records: &[PriceRecord]) -> Result<u64, StoreError> {
        self.calls.lock().push(StoreCall::Insert(records.len()));
        self.check_insert()?;

        self.rows.lock().extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn replace_for_date(
        &self,
        date: NaiveDate,
        records: &[PriceRecord],
    ) -> Result<u64, StoreError> {
        if !self.transactional {
            self.delete_by_date(date).await?;
            return self.insert_many(records).await;
        }

        self.calls.lock().push(StoreCall::Replace(date, records.len()));
        self.check_delete()?;
        self.check_insert()?;

        let mut rows = self.rows.lock();
        rows.retain(|r| r.date != date);
        rows.extend_from_slice(records);
        Ok(records.len() as u64)
    }
}
