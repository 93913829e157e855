//! # Inventory Repository
//!
//! Stock adjustments over batches of `(code, quantity)` pairs.
//!
//! ## Two Adjustment Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RECONCILE (absolute)             DECREMENT (relative, validated)       │
//! │  ─────────────────────            ───────────────────────────────       │
//! │  After a physical count.          After a sale or manual deduction.     │
//! │                                                                         │
//! │  stock = physical_qty             stock = stock - quantity              │
//! │  unknown code → skipped           unknown code → whole batch fails      │
//! │                                   stock < quantity → whole batch fails  │
//! │                                                                         │
//! │  Both run in ONE transaction per batch.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conditional Decrement
//! Each decrement is a single statement that checks and writes at once:
//!
//! ```sql
//! UPDATE products SET stock = stock - ? WHERE code = ? AND stock >= ?
//! ```
//!
//! Zero rows affected means the code is unknown or the stock is short; a
//! follow-up read inside the same transaction tells which, then everything
//! is rolled back. Two concurrent batches against the same product can
//! never both pass the check on stale stock.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::product::PRODUCT_COLUMNS;
use mercado_core::ledger::{stock_diff, validate_counts, validate_decrements};
use mercado_core::{CoreError, Product, StockCount, StockDecrement, StockDiff};

/// Repository for stock adjustments.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Compares physical counts against the catalog. Read only.
    ///
    /// Never fails for unknown codes: they come back as `"not found"` with
    /// zeroed fields.
    pub async fn diff(&self, counts: &[StockCount]) -> DbResult<Vec<StockDiff>> {
        validate_counts(counts)?;

        debug!(items = counts.len(), "Comparing physical counts");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?");
        let mut diffs = Vec::with_capacity(counts.len());

        for count in counts {
            let product = sqlx::query_as::<_, Product>(&sql)
                .bind(&count.code)
                .fetch_optional(&self.pool)
                .await?;
            diffs.push(stock_diff(count, product.as_ref()));
        }

        Ok(diffs)
    }

    /// Sets stock to the physically counted quantity for every item.
    ///
    /// Unknown codes are skipped without error. An empty batch is a no-op.
    ///
    /// ## Returns
    /// Number of products whose stock was written.
    pub async fn reconcile(&self, counts: &[StockCount]) -> DbResult<u64> {
        validate_counts(counts)?;

        if counts.is_empty() {
            return Ok(0);
        }

        debug!(items = counts.len(), "Reconciling stock");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::transaction("reconcile_stock", e))?;

        let mut updated = 0;
        for count in counts {
            let result = sqlx::query("UPDATE products SET stock = ? WHERE code = ?")
                .bind(count.physical_qty)
                .bind(&count.code)
                .execute(&mut *tx)
                .await?;
            updated += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::transaction("reconcile_stock", e))?;

        info!(items = counts.len(), updated, "Stock reconciled");
        Ok(updated)
    }

    /// Decrements stock for every item, all or nothing.
    ///
    /// Items apply in order, so repeated codes see the stock left by the
    /// earlier items of the same batch.
    ///
    /// ## User Workflow
    /// ```text
    /// A001 stock = 10
    /// decrement([{A001, 4}, {A001, 7}])
    ///      │
    ///      ├── {A001, 4}: 10 >= 4  → stock 6
    ///      └── {A001, 7}:  6 <  7  → InsufficientStock
    ///      │
    ///      ▼
    /// ROLLBACK → A001 stock = 10
    /// ```
    ///
    /// ## Returns
    /// * `Ok(())` - Every item applied
    /// * `Err(DbError::Core(CoreError::ProductNotFound))` - First unknown code
    /// * `Err(DbError::Core(CoreError::InsufficientStock))` - First short item
    pub async fn decrement(&self, items: &[StockDecrement]) -> DbResult<()> {
        validate_decrements(items)?;

        debug!(items = items.len(), "Decrementing stock");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::transaction("decrement_stock", e))?;

        for item in items {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ? WHERE code = ? AND stock >= ?",
            )
            .bind(item.quantity)
            .bind(&item.code)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 1 {
                continue;
            }

            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE code = ?")
                    .bind(&item.code)
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback()
                .await
                .map_err(|e| DbError::transaction("decrement_stock", e))?;

            let err = match available {
                None => CoreError::ProductNotFound(item.code.clone()),
                Some(available) => CoreError::InsufficientStock {
                    code: item.code.clone(),
                    available,
                    requested: item.quantity,
                },
            };
            warn!(error = %err, "Decrement batch rejected");
            return Err(err.into());
        }

        tx.commit()
            .await
            .map_err(|e| DbError::transaction("decrement_stock", e))?;

        info!(items = items.len(), "Stock decremented");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, product_draft};
    use crate::Database;

    async fn seeded() -> Database {
        let db = database().await;
        db.products().create(product_draft("A001", 10)).await.unwrap();
        db.products().create(product_draft("B002", 5)).await.unwrap();
        db
    }

    fn dec(code: &str, quantity: i64) -> StockDecrement {
        StockDecrement {
            code: code.to_string(),
            quantity,
        }
    }

    fn count(code: &str, physical_qty: i64) -> StockCount {
        StockCount {
            code: code.to_string(),
            physical_qty,
        }
    }

    async fn stock(db: &Database, code: &str) -> i64 {
        db.products().get(code).await.unwrap().stock
    }

    #[tokio::test]
    async fn test_decrement_applies_every_item() {
        let db = seeded().await;

        db.inventory()
            .decrement(&[dec("A001", 4), dec("B002", 5)])
            .await
            .unwrap();

        assert_eq!(stock(&db, "A001").await, 6);
        assert_eq!(stock(&db, "B002").await, 0);
    }

    #[tokio::test]
    async fn test_decrement_insufficient_rolls_back_whole_batch() {
        let db = seeded().await;

        let err = db
            .inventory()
            .decrement(&[dec("A001", 4), dec("A001", 7)])
            .await
            .unwrap_err();

        match err {
            DbError::Core(CoreError::InsufficientStock {
                code,
                available,
                requested,
            }) => {
                assert_eq!(code, "A001");
                assert_eq!(available, 6);
                assert_eq!(requested, 7);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(stock(&db, "A001").await, 10);
    }

    #[tokio::test]
    async fn test_decrement_unknown_code_rolls_back_earlier_items() {
        let db = seeded().await;

        let err = db
            .inventory()
            .decrement(&[dec("B002", 2), dec("X999", 1), dec("A001", 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::ProductNotFound(ref code)) if code == "X999"
        ));
        assert_eq!(stock(&db, "B002").await, 5);
        assert_eq!(stock(&db, "A001").await, 10);
    }

    #[tokio::test]
    async fn test_decrement_rejects_empty_and_non_positive() {
        let db = seeded().await;

        let err = db.inventory().decrement(&[]).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::EmptyBatch { .. })));

        let err = db
            .inventory()
            .decrement(&[dec("A001", 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(stock(&db, "A001").await, 10);
    }

    #[tokio::test]
    async fn test_reconcile_sets_absolute_stock_and_skips_unknown() {
        let db = seeded().await;

        let updated = db
            .inventory()
            .reconcile(&[count("A001", 3), count("X999", 5)])
            .await
            .unwrap();

        assert_eq!(updated, 1);
        assert_eq!(stock(&db, "A001").await, 3);
        assert!(db.products().find("X999").await.unwrap().is_none());

        assert_eq!(db.inventory().reconcile(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reconcile_rejects_negative_before_writing() {
        let db = seeded().await;

        let err = db
            .inventory()
            .reconcile(&[count("A001", 2), count("B002", -1)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(stock(&db, "A001").await, 10);
    }

    #[tokio::test]
    async fn test_diff_reports_known_and_unknown() {
        let db = seeded().await;

        let diffs = db
            .inventory()
            .diff(&[count("A001", 8), count("X999", 2)])
            .await
            .unwrap();

        assert_eq!(diffs[0].name, "Produto A001");
        assert_eq!(diffs[0].current_stock, 10);
        assert_eq!(diffs[0].difference, -2);

        assert_eq!(diffs[1].name, "not found");
        assert_eq!(diffs[1].current_stock, 0);
        assert_eq!(diffs[1].difference, 2);
        assert!(diffs[1].sale_price.is_zero());
    }
}
