//! # mercado-core: Pure Business Logic for Mercado POS
//!
//! Domain types and ledger rules for a small store's catalog, inventory
//! and sales. Pure functions only; no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercado POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                 Store clients (cashier, back office)            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                 apps/mercado-server (axum)                      │    │
//! │  │       /produtos, /vendas, /ajustar-estoque, /login, ...         │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │              ★ mercado-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│    │    │
//! │  │   │  Product  │  │   Money   │  │ build_sale│  │   rules   │    │    │
//! │  │   │   Sale    │  │  decimal  │  │ stock_diff│  │   checks  │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    mercado-db (Database Layer)                  │    │
//! │  │         SQLite queries, migrations, units of work               │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLine, User, ...)
//! - [`money`] - Integer-cent money and its decimal wire adapter
//! - [`ledger`] - Rules applied before every mutation
//! - [`validation`] - Field-level checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mercado_core::ledger::build_sale;
//! use mercado_core::money::Money;
//! use mercado_core::types::{SaleDraft, SaleLineDraft};
//!
//! let sale = build_sale(SaleDraft {
//!     lines: Some(vec![SaleLineDraft {
//!         code: Some("A001".into()),
//!         quantity: Some(2),
//!         unit_value: Some(Money::from_cents(1000)),
//!         subtotal: Some(Money::from_cents(2000)),
//!         unit_profit: Some(Money::from_cents(300)),
//!     }]),
//!     total: Some(Money::from_cents(2000)),
//! })
//! .unwrap();
//!
//! assert_eq!(sale.lines[0].line_profit.cents(), 600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product code (barcodes fit comfortably).
pub const MAX_CODE_LEN: usize = 50;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a user name.
pub const MAX_USER_NAME_LEN: usize = 100;

/// Largest stock level a product can hold.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Largest catalog or sale amount, in cents (R$10,000,000.00).
///
/// With [`MAX_STOCK`], one product's `stock × sale_price` stays within i64.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000;
