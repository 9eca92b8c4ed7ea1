//! Returns against recorded sales.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use stockroom_core::{NewSaleReturn, Page, Principal, ReturnFilter, SaleReturn, DEFAULT_PAGE_LIMIT};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReturnListQuery {
    pub sale_id: Option<i64>,
    pub product_id: Option<i64>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ReturnListQuery>,
) -> ApiResult<Json<Vec<SaleReturn>>> {
    let page = Page::new(
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    );
    let filter = ReturnFilter {
        sale_id: query.sale_id,
        product_id: query.product_id,
    };

    let returns = state
        .db
        .returns()
        .get_filtered(filter, page, principal.owner_scope())
        .await?;
    Ok(Json(returns))
}

/// `POST /returns`: puts `quantity` back in stock.
///
/// The quantity is checked against the originating sale alone; 400 when
/// it is larger, or when `product_id` is not the sale's product.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<NewSaleReturn>,
) -> ApiResult<(StatusCode, Json<SaleReturn>)> {
    let sale_return = state.db.workflow().record_return(input, &principal).await?;
    Ok((StatusCode::CREATED, Json(sale_return)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SaleReturn>> {
    let sale_return = state.db.returns().get(id, principal.owner_scope()).await?;
    Ok(Json(found(sale_return, "Return")?))
}
