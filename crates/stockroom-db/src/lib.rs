//! # stockroom-db: Database Layer for Stockroom
//!
//! SQLite storage for the inventory backend, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (apps/api)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌────────────────┐  ┌──────────────────┐  │   │
//! │  │   │   Database    │  │  Repositories  │  │ InventoryWorkflow│  │   │
//! │  │   │   (pool.rs)   │  │  (repository/) │  │  (workflow.rs)   │  │   │
//! │  │   │               │  │                │  │                  │  │   │
//! │  │   │ SqlitePool    │◄─│ CRUD, lookups, │  │ stock + ledger / │  │   │
//! │  │   │ migrations    │  │ eager JOINs    │  │ sale / return in │  │   │
//! │  │   │               │  │                │  │ one transaction  │  │   │
//! │  │   └───────────────┘  └────────────────┘  └──────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SQLite Database (WAL)                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per entity
//! - [`workflow`] - Stock-changing operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./stockroom.db")).await?;
//!
//! let low = db.products().get_low_stock(principal.owner_scope()).await?;
//! let sale = db.workflow().record_sale(new_sale, &principal).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use workflow::InventoryWorkflow;

pub use repository::{
    CategoryRepository, CustomerRepository, InventoryRepository, ProductRepository,
    ReturnRepository, SaleRepository, SupplierRepository, UserRepository,
};
