//! Customer CRUD. Shared by all users; email is unique when present.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use stockroom_core::{Customer, CustomerCreate, CustomerUpdate, Page};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().get_multi(page).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CustomerCreate>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let customer = state.db.customers().create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Customer>> {
    let customer = state.db.customers().get(id).await?;
    Ok(Json(found(customer, "Customer")?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<CustomerUpdate>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().update(id, patch).await?))
}

/// 409 once the customer has sales.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Customer>> {
    let customer = state.db.customers().remove(id).await?;
    Ok(Json(found(customer, "Customer")?))
}
