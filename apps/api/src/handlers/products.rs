//! Products. Every read returns the product with its category and
//! supplier, and is limited to the caller's own products unless the caller
//! is a superuser.
//!
//! `stock` is set once at creation. After that it only moves through
//! `/inventory`, `/sales` and `/returns`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension};
use stockroom_core::{Page, Principal, ProductCreate, ProductDetail, ProductUpdate};
use tracing::info;

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<ProductDetail>>> {
    let products = state
        .db
        .products()
        .get_multi(page, principal.owner_scope())
        .await?;
    Ok(Json(products))
}

/// `POST /products`: the caller becomes `created_by`.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<ProductCreate>,
) -> ApiResult<(StatusCode, Json<ProductDetail>)> {
    let product = state.db.products().create(input, principal.user_id).await?;

    info!(
        product_id = product.product.id,
        user_id = principal.user_id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state.db.products().get(id, principal.owner_scope()).await?;
    Ok(Json(found(product, "Product")?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductUpdate>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state
        .db
        .products()
        .update(id, patch, principal.owner_scope())
        .await?;
    Ok(Json(product))
}

/// 409 once the product has ledger entries, sales or returns.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state
        .db
        .products()
        .remove(id, principal.owner_scope())
        .await?;
    Ok(Json(found(product, "Product")?))
}

pub async fn by_sku(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(sku): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state
        .db
        .products()
        .get_by_sku(&sku, principal.owner_scope())
        .await?;
    Ok(Json(found(product, "Product")?))
}

pub async fn by_barcode(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(barcode): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state
        .db
        .products()
        .get_by_barcode(&barcode, principal.owner_scope())
        .await?;
    Ok(Json(found(product, "Product")?))
}

pub async fn by_category(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<ProductDetail>>> {
    let products = state
        .db
        .products()
        .get_by_category(id, page, principal.owner_scope())
        .await?;
    Ok(Json(products))
}

pub async fn by_supplier(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<ProductDetail>>> {
    let products = state
        .db
        .products()
        .get_by_supplier(id, page, principal.owner_scope())
        .await?;
    Ok(Json(products))
}

/// Every product with `stock <= min_quantity`. Not paginated.
pub async fn low_stock(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<ProductDetail>>> {
    let products = state
        .db
        .products()
        .get_low_stock(principal.owner_scope())
        .await?;
    Ok(Json(products))
}
