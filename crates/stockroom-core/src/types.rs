//! # Domain Types
//!
//! Records as they are stored and as clients receive them.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom Data Model                            │
//! │                                                                         │
//! │   ┌──────────┐      ┌──────────┐      ┌──────────┐                     │
//! │   │ Category │      │ Supplier │      │   User   │                     │
//! │   └────┬─────┘      └────┬─────┘      └────┬─────┘                     │
//! │        │ 0..1            │ 0..1            │ created_by                │
//! │        └────────┬────────┘                 │                           │
//! │                 ▼                          │                           │
//! │           ┌──────────┐◄────────────────────┤                           │
//! │           │ Product  │                     │                           │
//! │           └────┬─────┘                     │                           │
//! │      ┌─────────┼──────────────┐            │                           │
//! │      ▼         ▼              ▼            │                           │
//! │  ┌────────┐ ┌──────┐◄─────┌──────────┐     │                           │
//! │  │ Ledger │ │ Sale │      │  Return  │◄────┘                           │
//! │  │ entry  │ └──┬───┘      └──────────┘                                 │
//! │  └────────┘    │                                                        │
//! │                ▼                                                        │
//! │          ┌──────────┐                                                   │
//! │          │ Customer │                                                   │
//! │          └──────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eager Loading
//! Product and Sale are returned with their related records resolved
//! ([`ProductDetail`], [`SaleDetail`]). The repositories build these with a
//! single JOIN; nothing here triggers a query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Transaction Type
// =============================================================================

/// Kind of stock movement recorded in the ledger.
///
/// ```text
/// IN          stock + quantity
/// OUT         stock - quantity   (rejected if it would go below zero)
/// ADJUSTMENT  stock = quantity   (physical count)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    In,
    Out,
    Adjustment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
            TransactionType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Reference Data
// =============================================================================

/// Product grouping. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where products are bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A buyer. Email is unique when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// User
// =============================================================================

/// An account that can authenticate.
///
/// The password hash is loaded from the store but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    #[ts(skip)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked item.
///
/// `stock` is only ever changed by the inventory workflow and never drops
/// below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,

    /// Stock Keeping Unit. Unique when present.
    pub sku: Option<String>,

    /// Unique among non-empty values.
    pub barcode: Option<String>,

    /// Selling price in cents (> 0).
    pub price_cents: i64,

    /// Purchase cost in cents (> 0).
    pub cost_cents: i64,

    /// Units on hand.
    pub stock: i64,

    /// Reorder threshold. `stock <= min_quantity` is low stock.
    pub min_quantity: i64,

    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub created_by: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// At or below the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_quantity
    }
}

/// Product with its category and supplier resolved.
///
/// Serializes flat: the product fields plus `category` and `supplier`
/// objects (or `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub supplier: Option<Supplier>,
}

// =============================================================================
// Inventory Ledger
// =============================================================================

/// One append-only ledger entry. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryTransaction {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Ledger entry with the product it moved, as of the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryTransactionDetail {
    #[serde(flatten)]
    pub transaction: InventoryTransaction,
    pub product: ProductDetail,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale of one product to one customer.
///
/// `total_amount_cents` is `quantity × unit_price_cents`, computed once at
/// creation and never re-derived from later prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_amount_cents: i64,
    pub notes: Option<String>,
    pub created_by: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Sale with product and customer resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub product: Product,
    pub customer: Customer,
}

// =============================================================================
// Return
// =============================================================================

/// Units of a sale brought back into stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleReturn {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Reports
// =============================================================================

/// Aggregate over a date range of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: i64,
    pub total_revenue_cents: i64,
}

impl SalesSummary {
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_quantity: i64) -> Product {
        Product {
            id: 1,
            name: "Keyboard".to_string(),
            description: None,
            sku: Some("KB-001".to_string()),
            barcode: None,
            price_cents: 4999,
            cost_cents: 2500,
            stock,
            min_quantity,
            category_id: None,
            supplier_id: None,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(0, 0).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn test_transaction_type_wire_format() {
        let json = serde_json::to_string(&TransactionType::Adjustment).unwrap();
        assert_eq!(json, "\"ADJUSTMENT\"");
        let parsed: TransactionType = serde_json::from_str("\"IN\"").unwrap();
        assert_eq!(parsed, TransactionType::In);
        assert!(serde_json::from_str::<TransactionType>("\"in\"").is_err());
    }

    #[test]
    fn test_product_detail_serializes_flat() {
        let detail = ProductDetail {
            product: product(10, 5),
            category: None,
            supplier: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["sku"], "KB-001");
        assert_eq!(value["stock"], 10);
        assert!(value["category"].is_null());
    }

    #[test]
    fn test_user_hash_is_never_serialized() {
        let user = User {
            id: 1,
            email: "admin@example.com".to_string(),
            hashed_password: "$argon2id$secret".to_string(),
            full_name: None,
            is_active: true,
            is_superuser: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("argon2"));
    }
}
