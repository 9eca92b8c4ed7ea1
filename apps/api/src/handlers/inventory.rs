//! Stock ledger.
//!
//! `POST /inventory` is the direct way to move stock (IN, OUT, ADJUSTMENT).
//! Entries are append-only; there is no update or delete.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension};
use stockroom_core::{InventoryTransactionDetail, NewInventoryTransaction, Page, Principal};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<InventoryTransactionDetail>>> {
    let entries = state
        .db
        .inventory()
        .get_multi(page, principal.owner_scope())
        .await?;
    Ok(Json(entries))
}

/// ## Errors
/// - 404 product missing or not yours
/// - 409 `INSUFFICIENT_STOCK` for an OUT above stock
/// - 400 non-positive IN/OUT quantity, negative ADJUSTMENT
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<NewInventoryTransaction>,
) -> ApiResult<(StatusCode, Json<InventoryTransactionDetail>)> {
    let entry = state
        .db
        .workflow()
        .record_transaction(input, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<InventoryTransactionDetail>> {
    let entry = state.db.inventory().get(id, principal.owner_scope()).await?;
    Ok(Json(found(entry, "Inventory transaction")?))
}

pub async fn by_product(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<i64>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<InventoryTransactionDetail>>> {
    let entries = state
        .db
        .inventory()
        .get_by_product(product_id, page, principal.owner_scope())
        .await?;
    Ok(Json(entries))
}
