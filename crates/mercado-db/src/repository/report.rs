//! # Report Repository
//!
//! Read-only aggregates over the ledger and the catalog.
//!
//! ## Profit Summary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales                 sale_lines                                       │
//! │  id  total             sale_id  line_profit                             │
//! │  1   20.00   ◄──────── 1        6.00                                    │
//! │                        1        1.50                                    │
//! │  2   15.00   ◄──────── 2        4.00                                    │
//! │                                                                         │
//! │  Lines are summed per sale FIRST, then joined:                          │
//! │    total_sales  = 20.00 + 15.00        = 35.00                          │
//! │    total_profit = (6.00 + 1.50) + 4.00 = 11.50                          │
//! │                                                                         │
//! │  A flat JOIN would count sale 1's total once per line (55.00).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use mercado_core::ledger::profit_window;
use mercado_core::{CoreError, DateRange, Money, ProfitSummary};

/// Repository for aggregate reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sum of sale totals and of line profits.
    ///
    /// Filtered to `[start, end]` only when both bounds are given; all time
    /// otherwise. Only sales that have lines are counted. No matching rows
    /// gives zero for both sums.
    pub async fn profit_summary(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<ProfitSummary> {
        self.profit_summary_in(profit_window(start, end)).await
    }

    /// [`Self::profit_summary`] with an already resolved window.
    pub async fn profit_summary_in(&self, window: Option<DateRange>) -> DbResult<ProfitSummary> {
        const BASE: &str = r#"
            SELECT
                COALESCE(SUM(s.total_cents), 0),
                COALESCE(SUM(l.profit_cents), 0)
            FROM sales s
            JOIN (
                SELECT sale_id, SUM(line_profit_cents) AS profit_cents
                FROM sale_lines
                GROUP BY sale_id
            ) l ON l.sale_id = s.id
        "#;

        let (total_sales, total_profit): (i64, i64) = match window {
            Some(range) => {
                debug!(start = %range.start, end = %range.end, "Profit summary for range");
                let sql = format!("{BASE} WHERE s.sale_date BETWEEN ? AND ?");
                sqlx::query_as(&sql)
                    .bind(range.start)
                    .bind(range.end)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                debug!("Profit summary for all time");
                sqlx::query_as(BASE).fetch_one(&self.pool).await?
            }
        };

        Ok(ProfitSummary {
            total_sales: Money::from_cents(total_sales),
            total_profit: Money::from_cents(total_profit),
        })
    }

    /// Sum over the catalog of `stock × sale_price`. Zero for an empty
    /// catalog.
    ///
    /// Summed here with checked arithmetic: SQLite turns an overflowing
    /// integer product into REAL. A total beyond i64 cents is
    /// `CoreError::AmountOverflow`.
    pub async fn total_inventory_value(&self) -> DbResult<Money> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT stock, sale_price_cents FROM products WHERE stock > 0")
                .fetch_all(&self.pool)
                .await?;

        let cents = rows
            .iter()
            .try_fold(0i64, |acc, &(stock, price)| {
                stock.checked_mul(price).and_then(|value| acc.checked_add(value))
            })
            .ok_or_else(|| CoreError::AmountOverflow {
                what: "inventory value".to_string(),
            })?;

        debug!(products = rows.len(), cents, "Inventory value");
        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, product_draft, sale};
    use mercado_core::{MAX_AMOUNT_CENTS, MAX_STOCK};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_empty_ledger_and_catalog_report_zero() {
        let db = database().await;

        let summary = db.reports().profit_summary(None, None).await.unwrap();
        assert_eq!(summary, ProfitSummary::default());

        let value = db.reports().total_inventory_value().await.unwrap();
        assert!(value.is_zero());
    }

    #[tokio::test]
    async fn test_profit_summary_counts_each_total_once() {
        let db = database().await;
        db.sales()
            .record(&sale(&[("A001", 2, 1000, 300), ("B002", 1, 500, 150)], 2500))
            .await
            .unwrap();
        db.sales()
            .record(&sale(&[("C003", 1, 1500, 400)], 1500))
            .await
            .unwrap();

        let summary = db.reports().profit_summary(None, None).await.unwrap();
        assert_eq!(summary.total_sales.cents(), 4000);
        assert_eq!(summary.total_profit.cents(), 600 + 150 + 400);
    }

    #[tokio::test]
    async fn test_profit_summary_range_filter() {
        let db = database().await;
        let sales = db.sales();
        sales
            .record_on(&sale(&[("A001", 1, 1000, 300)], 1000), day(2024, 1, 15))
            .await
            .unwrap();
        sales
            .record_on(&sale(&[("A001", 2, 1000, 300)], 2000), day(2024, 2, 1))
            .await
            .unwrap();

        let january = db
            .reports()
            .profit_summary(Some(day(2024, 1, 1)), Some(day(2024, 1, 31)))
            .await
            .unwrap();
        assert_eq!(january.total_sales.cents(), 1000);
        assert_eq!(january.total_profit.cents(), 300);

        let none = db
            .reports()
            .profit_summary(Some(day(2023, 1, 1)), Some(day(2023, 12, 31)))
            .await
            .unwrap();
        assert_eq!(none, ProfitSummary::default());

        // A single bound is ignored: all time.
        let all = db
            .reports()
            .profit_summary(Some(day(2024, 2, 1)), None)
            .await
            .unwrap();
        assert_eq!(all.total_sales.cents(), 3000);
    }

    #[tokio::test]
    async fn test_total_inventory_value() {
        let db = database().await;
        // sale price 10.00 each
        db.products().create(product_draft("A001", 3)).await.unwrap();
        db.products().create(product_draft("B002", 0)).await.unwrap();
        db.products().create(product_draft("C003", 2)).await.unwrap();

        let value = db.reports().total_inventory_value().await.unwrap();
        assert_eq!(value.cents(), 5 * 1000);
    }

    #[tokio::test]
    async fn test_total_inventory_value_large_catalog() {
        let db = database().await;
        let mut draft = product_draft("A001", MAX_STOCK);
        draft.sale_price = Some(Money::from_cents(MAX_AMOUNT_CENTS));
        db.products().create(draft).await.unwrap();

        let value = db.reports().total_inventory_value().await.unwrap();
        assert_eq!(value.cents(), MAX_STOCK * MAX_AMOUNT_CENTS);

        // Ten maxed-out products exceed i64 cents.
        for i in 2..=10 {
            let mut draft = product_draft(&format!("P{i:03}"), MAX_STOCK);
            draft.sale_price = Some(Money::from_cents(MAX_AMOUNT_CENTS));
            db.products().create(draft).await.unwrap();
        }

        let err = db.reports().total_inventory_value().await.unwrap_err();
        assert!(matches!(
            err,
            crate::DbError::Core(CoreError::AmountOverflow { .. })
        ));
    }
}
