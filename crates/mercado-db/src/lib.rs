//! # mercado-db: Database Layer for Mercado POS
//!
//! SQLite persistence for the catalog, the sales ledger, the sales-lock
//! flag and users, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercado POS Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /ajustar-estoque)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   mercado-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐   │    │
//! │  │   │   Database    │    │  Repositories   │   │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │    │                 │   │  (embedded)  │   │    │
//! │  │   │               │    │ Product         │   │              │   │    │
//! │  │   │ SqlitePool    │◄───│ Inventory       │   │ 0001_initial │   │    │
//! │  │   │ WAL, FKs on   │    │ Sale, Report    │   │ _schema.sql  │   │    │
//! │  │   │               │    │ SalesLock, User │   │              │   │    │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘   │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database (mercado.db)                │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercado_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mercado.db")).await?;
//!
//! db.inventory().decrement(&items).await?;
//! let summary = db.reports().profit_summary(None, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::sales_lock::SalesLockRepository;
pub use repository::user::UserRepository;
