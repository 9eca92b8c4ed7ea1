//! Access gate.
//!
//! Resolves `Authorization: Bearer <token>` to an active user and makes it
//! available to handlers as an `Extension<Principal>`.
//!
//! ```text
//! no header / not "Bearer ..."          401 UNAUTHORIZED
//! bad signature, expired, wrong type    403 FORBIDDEN
//! subject is not a user                 403 FORBIDDEN
//! user.is_active == false               403 FORBIDDEN
//! otherwise                             → handler, with Principal
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use stockroom_core::Principal;
use tracing::debug;

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::AppState;

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Header borrows end here, before the first await
    let user_id = {
        let token = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        state.jwt.validate_access_token(token)?.user_id()?
    };

    let user = state
        .db
        .users()
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden("Could not validate credentials"))?;

    if !user.is_active {
        debug!(user_id, "Rejected inactive user");
        return Err(ApiError::forbidden("Inactive user"));
    }

    request
        .extensions_mut()
        .insert(Principal::from_user(&user));

    Ok(next.run(request).await)
}
