//! User accounts: registration, profile, administration.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension};
use stockroom_core::{NewUser, Page, Principal, User, UserCreate, UserPatch, UserRegister, UserUpdate};
use tracing::info;

use super::found;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::password::hash_password;
use crate::AppState;

async fn insert_user(state: &AppState, input: UserCreate) -> ApiResult<User> {
    input.validate()?;

    let user = state
        .db
        .users()
        .create(NewUser {
            email: input.email,
            hashed_password: hash_password(&input.password)?,
            full_name: input.full_name,
            is_active: true,
            is_superuser: input.is_superuser,
        })
        .await?;

    info!(user_id = user.id, is_superuser = user.is_superuser, "User created");
    Ok(user)
}

/// `POST /users/register`: open signup, never a superuser.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UserRegister>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = insert_user(&state, input.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users` (superuser).
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<User>>> {
    principal.require_superuser()?;
    Ok(Json(state.db.users().get_multi(page).await?))
}

/// `POST /users` (superuser).
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    principal.require_superuser()?;
    let user = insert_user(&state, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn read_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<User>> {
    let user = state.db.users().get(principal.user_id).await?;
    Ok(Json(found(user, "User")?))
}

/// `PUT /users/me`: email, password and full name only.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    input.validate()?;

    let hashed_password = match &input.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let patch = UserPatch {
        email: input.email,
        hashed_password,
        full_name: input.full_name,
        ..Default::default()
    };

    let user = state.db.users().update(principal.user_id, patch).await?;
    Ok(Json(user))
}

/// `GET /users/{id}`: yourself, or anyone if superuser.
pub async fn read_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    principal.require_self_or_superuser(id)?;
    let user = state.db.users().get(id).await?;
    Ok(Json(found(user, "User")?))
}
