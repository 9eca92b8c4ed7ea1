//! Sales.
//!
//! ```text
//! GET /sales?customer_id=3&start_date=2024-03-01&end_date=2024-03-31
//!                                      └─────── both days inclusive ──┘
//! GET /sales/summary?start_date=2024-03-01
//!     → { "total_sales": 42, "total_revenue_cents": 125990 }
//! ```

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension};
use chrono::NaiveDate;
use serde::Deserialize;
use stockroom_core::{
    DateRange, NewSale, Page, Principal, SaleDetail, SaleFilter, SalesSummary,
    DEFAULT_PAGE_LIMIT,
};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SaleListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub customer_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SaleListQuery>,
) -> ApiResult<Json<Vec<SaleDetail>>> {
    let page = Page::new(
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    );
    let filter = SaleFilter {
        customer_id: query.customer_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let sales = state
        .db
        .sales()
        .get_filtered(filter, page, principal.owner_scope())
        .await?;
    Ok(Json(sales))
}

/// `POST /sales`: takes `quantity` out of stock and freezes the total.
///
/// ## Errors
/// - 404 product (not yours) or customer missing
/// - 409 `INSUFFICIENT_STOCK`, stock unchanged
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<NewSale>,
) -> ApiResult<(StatusCode, Json<SaleDetail>)> {
    let sale = state.db.workflow().record_sale(input, &principal).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SaleDetail>> {
    let sale = state.db.sales().get(id, principal.owner_scope()).await?;
    Ok(Json(found(sale, "Sale")?))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<SalesSummary>> {
    let range = DateRange::from_dates(query.start_date, query.end_date)?;
    let summary = state
        .db
        .sales()
        .summary(range, principal.owner_scope())
        .await?;
    Ok(Json(summary))
}
