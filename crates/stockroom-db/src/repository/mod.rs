//! # Repository Module
//!
//! One repository per entity. Each is a thin struct over a pool handle.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_by_sku("KB-001", principal.owner_scope())   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get / get_multi / get_by_*      reads, eager JOINs               │
//! │  ├── create                          duplicate checks, INSERT          │
//! │  ├── update                          load, patch, single UPDATE        │
//! │  └── remove                          hard DELETE, returns the row      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every call is its own unit of work and commits immediately.           │
//! │  Stock never changes here; see crate::workflow.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Scope
//! Repositories for owned records take `owner: Option<i64>` and filter with
//! `(?N IS NULL OR created_by = ?N)`. `None` reads everything.

pub mod category;
pub mod customer;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod sale_return;
pub mod supplier;
pub mod user;

pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use inventory::InventoryRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use sale_return::ReturnRepository;
pub use supplier::SupplierRepository;
pub use user::UserRepository;
