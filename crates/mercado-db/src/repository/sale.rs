//! # Sale Repository
//!
//! The sales ledger: recording a sale with its lines, and reading sales
//! back by day range.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Unit of Work                                  │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO sales (sale_date = today, total_cents)  → sale id     │
//! │   ├── INSERT INTO sale_lines (sale id, ..., line_profit = p × q)        │
//! │   ├── INSERT INTO sale_lines (...)                                      │
//! │   └── ...                                                               │
//! │  COMMIT  ── any failure before this point rolls back the header too     │
//! │                                                                         │
//! │  Readers never see a sale without all of its lines.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recording a sale does not touch product stock. Callers decrement stock
//! with a separate [`InventoryRepository::decrement`] call.
//!
//! [`InventoryRepository::decrement`]: crate::repository::inventory::InventoryRepository::decrement

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use mercado_core::ledger::sales_window;
use mercado_core::{DateRange, NewSale, Sale, SaleLine, SaleWithLines};

const SALE_COLUMNS: &str = "id, sale_date AS date, total_cents AS total";

const LINE_COLUMNS: &str = "id, sale_id, product_code, quantity, \
     unit_value_cents AS unit_value, subtotal_cents AS subtotal, \
     unit_profit_cents AS unit_profit, line_profit_cents AS line_profit";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a validated sale dated today (server clock, UTC day).
    ///
    /// Build the [`NewSale`] with [`mercado_core::ledger::build_sale`]; line
    /// profits are taken from it as computed there.
    ///
    /// ## Returns
    /// The new sale id.
    pub async fn record(&self, sale: &NewSale) -> DbResult<i64> {
        self.record_on(sale, Utc::now().date_naive()).await
    }

    /// Records a validated sale on an explicit day (imports, seeding).
    pub async fn record_on(&self, sale: &NewSale, date: NaiveDate) -> DbResult<i64> {
        debug!(lines = sale.lines.len(), total = %sale.total, %date, "Recording sale");

        let result = self.insert_sale(sale, date).await;
        if let Err(err) = &result {
            error!(error = %err, "Sale recording failed, rolled back");
        }
        result
    }

    async fn insert_sale(&self, sale: &NewSale, date: NaiveDate) -> DbResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::transaction("record_sale", e))?;

        let sale_id = sqlx::query("INSERT INTO sales (sale_date, total_cents) VALUES (?, ?)")
            .bind(date)
            .bind(sale.total)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for line in &sale.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    sale_id, product_code, quantity,
                    unit_value_cents, subtotal_cents,
                    unit_profit_cents, line_profit_cents
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(sale_id)
            .bind(&line.code)
            .bind(line.quantity)
            .bind(line.unit_value)
            .bind(line.subtotal)
            .bind(line.unit_profit)
            .bind(line.line_profit)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::transaction("record_sale", e))?;

        info!(sale_id, lines = sale.lines.len(), total = %sale.total, "Sale recorded");
        Ok(sale_id)
    }

    /// Gets one sale with its lines.
    pub async fn get(&self, id: i64) -> DbResult<SaleWithLines> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id.to_string()))?;

        let sql = format!("SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ? ORDER BY id");
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(SaleWithLines { sale, lines })
    }

    /// Lists sales with their lines.
    ///
    /// With both bounds the inclusive `[start, end]` window is used;
    /// otherwise only today's sales are returned.
    pub async fn list(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<SaleWithLines>> {
        let window = sales_window(start, end, Utc::now().date_naive());
        self.in_range(window).await
    }

    /// Sales whose day falls in `range` (inclusive), ascending by date.
    pub async fn in_range(&self, range: DateRange) -> DbResult<Vec<SaleWithLines>> {
        debug!(start = %range.start, end = %range.end, "Listing sales");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE sale_date BETWEEN ? AND ? ORDER BY sale_date, id"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {LINE_COLUMNS} FROM sale_lines \
             WHERE sale_id IN (SELECT id FROM sales WHERE sale_date BETWEEN ? AND ?) \
             ORDER BY sale_id, id"
        );
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        let mut by_sale: HashMap<i64, Vec<SaleLine>> = HashMap::new();
        for line in lines {
            by_sale.entry(line.sale_id).or_default().push(line);
        }

        let result: Vec<SaleWithLines> = sales
            .into_iter()
            .map(|sale| {
                let lines = by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithLines { sale, lines }
            })
            .collect();

        debug!(count = result.len(), "Listed sales");
        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
