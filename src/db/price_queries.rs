use chrono::{Datelike, NaiveDate};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::models::{PriceQuery, PriceRecord, SortKey, SortOrder};

// High bits of the advisory lock key; the low bits are the day number.
const REPLACE_LOCK_NAMESPACE: i64 = 0x5941_5341_0000_0000;

pub async fn fetch(
    pool: &PgPool,
    query: &PriceQuery,
) -> Result<Vec<PriceRecord>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT name, price, date FROM vegetable_prices WHERE TRUE");

    if let Some(date) = query.date {
        qb.push(" AND date = ").push_bind(date);
    }
    if let Some(name) = &query.name {
        qb.push(" AND name = ").push_bind(name.clone());
    }

    let direction = match query.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };
    let column = match query.sort_by {
        SortKey::Date => "date",
        SortKey::Name => "name",
    };
    // id keeps rows that tie on the sort key in insertion order
    qb.push(format!(" ORDER BY {} {}, id ASC", column, direction));

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    qb.build_query_as::<PriceRecord>()
        .fetch_all(pool)
        .await
}

pub async fn fetch_latest_date(pool: &PgPool) -> Result<Option<NaiveDate>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(date) FROM vegetable_prices")
        .fetch_one(pool)
        .await
}

pub async fn delete_by_date<'e, E>(executor: E, date: NaiveDate) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM vegetable_prices WHERE date = $1")
        .bind(date)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn insert_many<'e, E>(executor: E, records: &[PriceRecord]) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    if records.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO vegetable_prices (date, name, price) ");
    qb.push_values(records, |mut row, r| {
        row.push_bind(r.date)
            .push_bind(r.name.clone())
            .push_bind(r.price.clone());
    });

    let result = qb.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// Delete and insert inside one transaction.
///
/// A transaction-scoped advisory lock keyed by the date serializes concurrent
/// replaces of the same day, including ones from other processes.
pub async fn replace_for_date(
    pool: &PgPool,
    date: NaiveDate,
    records: &[PriceRecord],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin replace transaction for {}: {}", date, e);
        e
    })?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(replace_lock_key(date))
        .execute(&mut *tx)
        .await?;

    let deleted = delete_by_date(&mut *tx, date).await?;

    let inserted = match insert_many(&mut *tx, records).await {
        Ok(n) => n,
        Err(e) => {
            error!(
                "Failed to insert {} rows for {} (rolling back {} deletions): {}",
                records.len(), date, deleted, e
            );
            return Err(e);
        }
    };

    tx.commit().await.map_err(|e| {
        error!("Failed to commit replace transaction for {}: {}", date, e);
        e
    })?;

    Ok(inserted)
}

pub fn replace_lock_key(date: NaiveDate) -> i64 {
    REPLACE_LOCK_NAMESPACE + date.num_days_from_ce() as i64
}
