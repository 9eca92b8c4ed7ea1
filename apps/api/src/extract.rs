//! Request extractors that reject with [`ApiError`].
//!
//! Drop-in replacements for the axum extractors of the same name. A body,
//! path or query string that fails to parse becomes a 400
//! `VALIDATION_ERROR` with the usual `{code, message}` body instead of
//! axum's plain-text rejection.
//!
//! ```text
//! GET /products/abc          → 400 { "code": "VALIDATION_ERROR", ... }
//! POST /sales {"quantity":1} → 400 { "code": "VALIDATION_ERROR", ... }
//! ```

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// JSON body in, JSON body out.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// `application/x-www-form-urlencoded` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct Form<T>(pub T);
