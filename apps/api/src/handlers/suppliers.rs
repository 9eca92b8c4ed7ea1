//! Supplier CRUD. Shared by all users.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use stockroom_core::{Supplier, SupplierCreate, SupplierUpdate, Page};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.suppliers().get_multi(page).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SupplierCreate>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.db.suppliers().create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Supplier>> {
    let supplier = state.db.suppliers().get(id).await?;
    Ok(Json(found(supplier, "Supplier")?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<SupplierUpdate>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(state.db.suppliers().update(id, patch).await?))
}

/// 409 while products still reference the supplier.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Supplier>> {
    let supplier = state.db.suppliers().remove(id).await?;
    Ok(Json(found(supplier, "Supplier")?))
}
