//! # Stock Rules
//!
//! The arithmetic every stock-changing workflow agrees on.
//!
//! ## Movements
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Stock Changes                                    │
//! │                                                                         │
//! │  Ledger IN  (qty > 0)      stock + qty                                 │
//! │  Ledger OUT (qty > 0)      stock - qty   ✗ if qty > stock              │
//! │  ADJUSTMENT (qty >= 0)     stock = qty                                 │
//! │  Sale       (qty > 0)      stock - qty   ✗ if qty > stock              │
//! │  Return     (qty > 0)      stock + qty   ✗ if qty > sale.quantity      │
//! │                                                                         │
//! │  Invariant: no accepted movement leaves stock below zero.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! stockroom-db enforces the same rules inside SQL (conditional UPDATE) so
//! that concurrent requests cannot both pass a check against stale stock.
//! These functions are the reference the store queries are tested against,
//! and they produce the errors the workflow reports.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::TransactionType;

/// Computes the stock level after a ledger movement.
///
/// ## Example
/// ```rust
/// use stockroom_core::stock::apply_movement;
/// use stockroom_core::TransactionType;
///
/// assert_eq!(apply_movement(1, TransactionType::In, 10, 5).unwrap(), 15);
/// assert!(apply_movement(1, TransactionType::Out, 15, 20).is_err());
/// assert_eq!(apply_movement(1, TransactionType::Adjustment, 15, 0).unwrap(), 0);
/// ```
pub fn apply_movement(
    product_id: i64,
    kind: TransactionType,
    current: i64,
    quantity: i64,
) -> CoreResult<i64> {
    match kind {
        TransactionType::In => {
            if quantity <= 0 {
                return Err(ValidationError::positive("quantity").into());
            }
            current
                .checked_add(quantity)
                .ok_or_else(|| overflow("quantity"))
        }
        TransactionType::Out => {
            if quantity <= 0 {
                return Err(ValidationError::positive("quantity").into());
            }
            check_sale(product_id, current, quantity)?;
            Ok(current - quantity)
        }
        TransactionType::Adjustment => {
            if quantity < 0 {
                return Err(ValidationError::non_negative("quantity").into());
            }
            Ok(quantity)
        }
    }
}

/// Rejects a removal of `requested` units when only `available` are on hand.
pub fn check_sale(product_id: i64, available: i64, requested: i64) -> CoreResult<()> {
    if requested > available {
        return Err(CoreError::InsufficientStock {
            product_id,
            available,
            requested,
        });
    }
    Ok(())
}

/// Rejects a return larger than the sale it refers to.
///
/// Only the single sale is compared; earlier returns against the same sale
/// are not added up.
pub fn check_return(sale_id: i64, sold: i64, requested: i64) -> CoreResult<()> {
    if requested > sold {
        return Err(CoreError::ReturnExceedsSale {
            sale_id,
            sold,
            requested,
        });
    }
    Ok(())
}

/// Frozen sale total: `quantity × unit_price`, exact.
///
/// ```rust
/// use stockroom_core::money::Money;
/// use stockroom_core::stock::sale_total;
///
/// assert_eq!(sale_total(3, Money::from_cents(999)).unwrap().cents(), 2997);
/// ```
pub fn sale_total(quantity: i64, unit_price: Money) -> CoreResult<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| overflow("total_amount"))
}

fn overflow(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
