//! Password login.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::AccessToken;
use crate::error::{ApiError, ApiResult};
use crate::extract::Form;
use crate::password::verify_password;
use crate::AppState;

/// OAuth2 password-grant form. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /login/access-token` (form-encoded).
///
/// Unknown email and wrong password give the same answer.
pub async fn login_access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<AccessToken>> {
    let user = state.db.users().get_by_email(form.username.trim()).await?;

    let user = match user {
        Some(user) if verify_password(&form.password, &user.hashed_password) => user,
        _ => {
            warn!(email = %form.username, "Login failed");
            return Err(ApiError::unauthorized("Incorrect email or password"));
        }
    };

    if !user.is_active {
        return Err(ApiError::forbidden("Inactive user"));
    }

    let token = state.jwt.generate_access_token(user.id)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(token))
}
