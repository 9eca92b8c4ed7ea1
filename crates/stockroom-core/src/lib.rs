//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! Everything the inventory backend knows about its entities that does not
//! touch a database or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockroom Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum handlers)                        │   │
//! │  │   bearer token ──► Principal ──► repository / workflow call     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  input  │ │  money  │ │  stock  │ │ access  │  │   │
//! │  │   │ records │ │ patches │ │  Money  │ │  rules  │ │Principal│  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (SQLite layer)                     │   │
//! │  │        repositories, migrations, inventory workflow             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity records (Product, Sale, SaleReturn, ...)
//! - [`input`] - Create payloads, partial-update patches, paging
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stock`] - Stock movement rules shared by every workflow
//! - [`access`] - The authenticated principal and ownership scoping
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::Money;
//! use stockroom_core::stock::sale_total;
//!
//! // 3 units at $9.99
//! let total = sale_total(3, Money::from_cents(999)).unwrap();
//! assert_eq!(total.cents(), 2997);
//! assert_eq!(total.to_string(), "$29.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod input;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::Principal;
pub use error::{CoreError, CoreResult, ValidationError};
pub use input::*;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a list request does not name one.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Upper bound for a single page.
///
/// Requests above this are clamped rather than rejected.
pub const MAX_PAGE_LIMIT: i64 = 1000;
