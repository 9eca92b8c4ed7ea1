//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors                                                   │
//! │  └── DbError          - Store failures, wraps CoreError                │
//! │                                                                         │
//! │  apps/api errors                                                       │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is a condition the caller can fix by changing the
//! request. None of them is retried.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stock too low for an OUT movement or a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /sales { product_id: 7, quantity: 20 }
    ///      │
    ///      ▼
    /// stock on hand: 15
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 15, requested: 20 }
    ///      │
    ///      ▼
    /// 409 INSUFFICIENT_STOCK, stock stays 15
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// A return asked for more units than the originating sale sold.
    #[error("Return quantity {requested} exceeds quantity {sold} sold in sale {sale_id}")]
    ReturnExceedsSale {
        sale_id: i64,
        sold: i64,
        requested: i64,
    },

    /// Principal lacks the privilege tier for the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any repository or workflow runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed email, bad SKU characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} does not match: {reason}")]
    Mismatch { field: String, reason: String },

    /// Duplicate value (e.g. duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub fn non_negative(field: &str) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 15,
            requested: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 15, requested 20"
        );

        let err = CoreError::ReturnExceedsSale {
            sale_id: 3,
            sold: 3,
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "Return quantity 4 exceeds quantity 3 sold in sale 3"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");
        assert_eq!(
            ValidationError::positive("price").to_string(),
            "price must be positive"
        );
        let err = ValidationError::Duplicate {
            field: "sku".to_string(),
            value: "KB-001".to_string(),
        };
        assert_eq!(err.to_string(), "sku 'KB-001' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
