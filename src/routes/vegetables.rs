use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::{serialize_price, PriceRecord, PRICE_UNIT};
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vegetables))
        .route("/:name", get(get_vegetable))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct VegetablePrice {
    #[serde(flatten)]
    pub record: PriceRecord,
    pub unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VegetableListResponse {
    pub status: &'static str,
    pub date: Option<NaiveDate>,
    pub data: Vec<VegetablePrice>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_price")]
    pub price: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct VegetableDetail {
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: BigDecimal,
    pub date: NaiveDate,
    pub unit: &'static str,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Serialize)]
pub struct VegetableDetailResponse {
    pub status: &'static str,
    pub data: VegetableDetail,
}

pub async fn list_vegetables(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<VegetableListResponse>, AppError> {
    let Query(params) = params?;
    info!("GET /api/vegetables - date: {:?}, limit: {:?}", params.date, params.limit);

    let (date, records) =
        price_service::list_for_day(state.store.as_ref(), params.date, params.limit).await?;

    let data: Vec<VegetablePrice> = records
        .into_iter()
        .map(|record| VegetablePrice { record, unit: PRICE_UNIT })
        .collect();

    Ok(Json(VegetableListResponse {
        status: "success",
        date,
        count: data.len(),
        data,
    }))
}

pub async fn get_vegetable(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<VegetableDetailResponse>, AppError> {
    info!("GET /api/vegetables/{} - Getting price history", name);

    let history = price_service::history_for(state.store.as_ref(), &name).await?;

    Ok(Json(VegetableDetailResponse {
        status: "success",
        data: VegetableDetail {
            name: history.name,
            price: history.latest.price,
            date: history.latest.date,
            unit: PRICE_UNIT,
            history: history
                .history
                .into_iter()
                .map(|(date, price)| HistoryPoint { date, price })
                .collect(),
        },
    }))
}
