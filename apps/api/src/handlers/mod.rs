//! Request handlers, one module per resource.
//!
//! Handlers parse the request, call one repository or workflow method and
//! wrap the result. Owned resources pass `principal.owner_scope()` down so
//! the store does the filtering.

pub mod categories;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod login;
pub mod products;
pub mod returns;
pub mod sales;
pub mod suppliers;
pub mod users;

use crate::error::ApiError;

/// 404 for a lookup that came back empty.
pub(crate) fn found<T>(value: Option<T>, entity: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::not_found(format!("{entity} not found")))
}
