use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::error;

use crate::errors::AppError;
use crate::models::{PriceQuery, PriceRecord, SortKey, SortOrder};
use crate::store::PriceStore;

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;
pub const HISTORY_DAYS: i64 = 30;

/// Latest price for one vegetable and its recent history, oldest first.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub name: String,
    pub latest: PriceRecord,
    pub history: Vec<(NaiveDate, BigDecimal)>,
}

/// Prices for `date`, or for the most recent stored date when none is given.
pub async fn list_for_day(
    store: &dyn PriceStore,
    date: Option<NaiveDate>,
    limit: Option<i64>,
) -> Result<(Option<NaiveDate>, Vec<PriceRecord>), AppError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIST_LIMIT
        )));
    }

    let date = match date {
        Some(d) => Some(d),
        None => store.latest_date().await.map_err(|e| {
            error!("Failed to look up latest price date: {}", e);
            AppError::Store(e)
        })?,
    };

    let Some(date) = date else {
        return Ok((None, Vec::new()));
    };

    let records = store
        .select(&PriceQuery::for_date(date).limit(limit))
        .await
        .map_err(|e| {
            error!("Failed to fetch prices for {}: {}", date, e);
            AppError::Store(e)
        })?;

    Ok((Some(date), records))
}

pub async fn history_for(store: &dyn PriceStore, name: &str) -> Result<PriceHistory, AppError> {
    let query = PriceQuery::for_name(name)
        .sorted(SortKey::Date, SortOrder::Descending)
        .limit(HISTORY_DAYS);

    let mut rows = store.select(&query).await.map_err(|e| {
        error!("Failed to fetch price history for {}: {}", name, e);
        AppError::Store(e)
    })?;

    let Some(latest) = rows.first().cloned() else {
        return Err(AppError::NotFound(format!("No price data found for {}", name)));
    };

    rows.reverse();

    Ok(PriceHistory {
        name: name.to_string(),
        latest,
        history: rows.into_iter().map(|r| (r.date, r.price)).collect(),
    })
}
