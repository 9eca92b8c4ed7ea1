//! # Validation Module
//!
//! Field validators run at the boundary, before any repository or
//! workflow call.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json / Query)                           │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, called from input::*::validate()                │
//! │  └── Ranges, lengths, formats                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: stockroom-db                                                 │
//! │  ├── Duplicate pre-checks (sku, barcode, email, category name)         │
//! │  └── SQLite NOT NULL / UNIQUE / FOREIGN KEY / CHECK constraints        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("KB-001").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name (products, categories, suppliers, customers).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted SKU or barcode.
pub const MAX_CODE_LEN: usize = 64;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name for the given field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_CODE_LEN`] characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("KB-001").is_ok());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    validate_code("sku", sku, |c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Validates a barcode (EAN, UPC or an internal code).
///
/// Letters and digits only, so scanners and manual entry agree.
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    validate_code("barcode", barcode, |c| c.is_ascii_alphanumeric())
}

fn validate_code(field: &str, code: &str, allowed: impl Fn(char) -> bool) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required(field));
    }

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "contains unsupported characters".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Structural check only: one `@`, non-empty local part, a dot in the
/// domain, no whitespace.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required(field));
    }

    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }

    Ok(())
}

/// Trims an optional string and maps blank values to `None`.
///
/// Applied to SKU and barcode so `""` never competes for a unique slot.
///
/// ```rust
/// use stockroom_core::validation::normalize_optional;
///
/// assert_eq!(normalize_optional(Some("  ".to_string())), None);
/// assert_eq!(normalize_optional(Some(" KB-1 ".to_string())), Some("KB-1".to_string()));
/// ```
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity moved by a sale, return or IN/OUT entry.
///
/// ## User Workflow
/// ```text
/// POST /sales { quantity: 0, ... }
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       └── qty <= 0? → 400 VALIDATION_ERROR "quantity must be positive"
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_positive("quantity", qty)
}

/// Validates a price or cost in cents. Zero is rejected.
///
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price", 999).is_ok());
/// assert!(validate_price_cents("price", 0).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_positive(field, cents)
}

pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::positive(field));
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::non_negative(field));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
