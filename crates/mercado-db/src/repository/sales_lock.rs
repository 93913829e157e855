//! # Sales Lock Repository
//!
//! The store-wide "stop selling" switch, kept as a singleton row
//! (`sales_lock.id = 1`) so every handler and every process sees the same
//! value.
//!
//! The flag is advisory: nothing in this crate refuses a sale while it is
//! set. Cashier clients read it and stop offering checkout.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for the sales-lock flag.
#[derive(Debug, Clone)]
pub struct SalesLockRepository {
    pool: SqlitePool,
}

impl SalesLockRepository {
    /// Creates a new SalesLockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesLockRepository { pool }
    }

    /// Current flag value. A missing row reads as unlocked.
    pub async fn get(&self) -> DbResult<bool> {
        let locked: Option<bool> = sqlx::query_scalar("SELECT locked FROM sales_lock WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        debug!(?locked, "Read sales lock");
        Ok(locked.unwrap_or(false))
    }

    /// Overwrites the flag. Any transition is allowed.
    pub async fn set(&self, locked: bool) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sales_lock (id, locked) VALUES (1, ?)
            ON CONFLICT (id) DO UPDATE SET locked = excluded.locked
            "#,
        )
        .bind(locked)
        .execute(&self.pool)
        .await?;

        info!(locked, "Sales lock updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::database;

    #[tokio::test]
    async fn test_starts_unlocked_and_toggles() {
        let db = database().await;
        let lock = db.sales_lock();

        assert!(!lock.get().await.unwrap());

        lock.set(true).await.unwrap();
        assert!(lock.get().await.unwrap());

        // Idempotent overwrite
        lock.set(true).await.unwrap();
        assert!(lock.get().await.unwrap());

        lock.set(false).await.unwrap();
        assert!(!lock.get().await.unwrap());
    }

    #[tokio::test]
    async fn test_lock_does_not_block_sales() {
        let db = database().await;
        db.sales_lock().set(true).await.unwrap();

        let sale = crate::repository::test_support::sale(&[("A001", 1, 500, 100)], 500);
        assert!(db.sales().record(&sale).await.is_ok());
    }

    #[tokio::test]
    async fn test_singleton_row() {
        let db = database().await;
        db.sales_lock().set(true).await.unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_lock")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
