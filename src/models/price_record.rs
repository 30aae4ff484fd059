use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// Unit reported alongside every price served by the API.
pub const PRICE_UNIT: &str = "円/kg";

// One observed vegetable price for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PriceRecord {
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: BigDecimal,      // NUMERIC(12,2)
    pub date: NaiveDate,        // DATE
}

impl PriceRecord {
    pub fn new(name: impl Into<String>, price: BigDecimal, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            price,
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Name,
}

/// Filter/order/limit selection passed to the price store.
#[derive(Debug, Clone, Default)]
pub struct PriceQuery {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub limit: Option<i64>,
}

impl PriceQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            sort_by: SortKey::Name,
            ..Default::default()
        }
    }

    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn sorted(mut self, sort_by: SortKey, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// JSON clients expect a number, not the decimal's string form.
pub fn serialize_price<S>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Parse the decimal text so 150.01 stays the nearest f64 to 150.01.
    match price.to_string().parse::<f64>() {
        Ok(value) if value.is_finite() => serializer.serialize_f64(value),
        _ => Err(serde::ser::Error::custom(format!("price {} is not representable", price))),
    }
}
