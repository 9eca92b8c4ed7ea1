//! Category CRUD. Shared by all users.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use stockroom_core::{Category, CategoryCreate, CategoryUpdate, Page};

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().get_multi(page).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CategoryCreate>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.db.categories().create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = state.db.categories().get(id).await?;
    Ok(Json(found(category, "Category")?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.db.categories().update(id, patch).await?))
}

/// 409 while products still reference the category.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = state.db.categories().remove(id).await?;
    Ok(Json(found(category, "Category")?))
}
