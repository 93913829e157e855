//! # Repository Module
//!
//! Database repository implementations for Mercado POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.inventory().decrement(&items)                         │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── ledger rule (mercado-core)  ← reject bad input, nothing written    │
//! │  └── unit of work (SQL)          ← BEGIN ... COMMIT / ROLLBACK          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD
//! - [`InventoryRepository`](inventory::InventoryRepository) - Reconcile, diff, decrement
//! - [`SaleRepository`](sale::SaleRepository) - Record and read sales
//! - [`SalesLockRepository`](sales_lock::SalesLockRepository) - The sales-lock flag
//! - [`ReportRepository`](report::ReportRepository) - Profit and stock value
//! - [`UserRepository`](user::UserRepository) - Users and login

pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod sales_lock;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Database, DbConfig};
    use mercado_core::ledger::build_sale;
    use mercado_core::{Money, NewSale, ProductDraft, SaleDraft, SaleLineDraft};

    /// Fresh, migrated in-memory database.
    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Cost 7.00, sale price 10.00, unit profit 3.00.
    pub fn product_draft(code: &str, stock: i64) -> ProductDraft {
        ProductDraft {
            code: Some(code.to_string()),
            name: Some(format!("Produto {code}")),
            cost: Some(Money::from_cents(700)),
            stock: Some(stock),
            sale_price: Some(Money::from_cents(1000)),
            unit_profit: Some(Money::from_cents(300)),
        }
    }

    /// Builds a sale from `(code, quantity, unit_value_cents, unit_profit_cents)`.
    pub fn sale(lines: &[(&str, i64, i64, i64)], total_cents: i64) -> NewSale {
        let lines = lines
            .iter()
            .map(|&(code, quantity, unit_value, unit_profit)| SaleLineDraft {
                code: Some(code.to_string()),
                quantity: Some(quantity),
                unit_value: Some(Money::from_cents(unit_value)),
                subtotal: Some(Money::from_cents(unit_value * quantity)),
                unit_profit: Some(Money::from_cents(unit_profit)),
            })
            .collect();

        build_sale(SaleDraft {
            lines: Some(lines),
            total: Some(Money::from_cents(total_cents)),
        })
        .unwrap()
    }
}
