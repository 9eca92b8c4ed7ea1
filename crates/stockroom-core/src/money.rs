//! # Money Module
//!
//! Integer money for prices, costs and sale totals.
//!
//! ## Why Integers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FLOATING POINT                     INTEGER CENTS                       │
//! │                                                                         │
//! │  9.99 * 3 = 29.969999999999995      999 * 3 = 2997  →  "$29.97"        │
//! │  0.1 + 0.2 = 0.30000000000000004    10 + 20 = 30    →  "$0.30"         │
//! │                                                                         │
//! │  A sale total is frozen at creation, so it has to be exact once.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every money column in the store is an `INTEGER` holding cents
//! (`price_cents`, `cost_cents`, `unit_price_cents`, `total_amount_cents`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// Amount of money in cents.
///
/// ## Example
/// ```rust
/// use stockroom_core::money::Money;
///
/// let price = Money::from_cents(999);
/// assert_eq!(price.to_string(), "$9.99");
/// assert_eq!((price * 3).cents(), 2997);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units and cents.
    ///
    /// The sign of `major` applies to the whole amount.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(9, 99).cents(), 999);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the raw value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /sales { quantity: 3, unit_price_cents: 999 }
    ///      │
    ///      ▼
    /// checked_mul(3) ← THIS FUNCTION
    ///      │
    ///      ├── overflow → VALIDATION_ERROR
    ///      │
    ///      ▼
    /// total_amount_cents: 2997 (frozen on the sale row)
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `$12.34`, with a leading `-` for negative amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
