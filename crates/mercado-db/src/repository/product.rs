//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - List (all, or filtered by a set of codes)
//! - Get / create / partial update / delete, keyed by `code`
//!
//! ## Partial Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PUT /produtos/A001  { "estoque": 5 }                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductUpdate { name: None, cost: None, stock: Some(5) }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET                                                    │
//! │      name       = COALESCE(NULL, name),        ← kept                   │
//! │      cost_cents = COALESCE(NULL, cost_cents),  ← kept                   │
//! │      stock      = COALESCE(5,    stock)        ← replaced               │
//! │  WHERE code = 'A001'                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a product never touches `sale_lines`: historical lines keep the
//! code as a soft reference.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use mercado_core::ledger::{normalize_update, validate_new_product};
use mercado_core::{Product, ProductDraft, ProductUpdate};

/// Column list mapping `products` onto [`Product`].
pub(crate) const PRODUCT_COLUMNS: &str =
    "code, name, cost_cents AS cost, stock, sale_price_cents AS sale_price, \
     unit_profit_cents AS unit_profit";

/// Codes bound per `IN (...)` query; kept well under SQLite's
/// bound-parameter limit.
const CODES_PER_QUERY: usize = 500;

/// A product with its insertion position, for merging chunked lookups.
#[derive(sqlx::FromRow)]
struct RankedProduct {
    position: i64,
    #[sqlx(flatten)]
    product: Product,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list(None).await?;
/// let some = repo.list(Some(&["A001".into(), "B002".into()])).await?;
/// let rice = repo.get("A001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products in insertion order.
    ///
    /// With `Some(codes)` only matching products are returned; unknown codes
    /// are silently omitted and an empty set yields an empty list.
    pub async fn list(&self, codes: Option<&[String]>) -> DbResult<Vec<Product>> {
        let Some(codes) = codes else {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid");
            let products = sqlx::query_as::<_, Product>(&sql)
                .fetch_all(&self.pool)
                .await?;
            debug!(count = products.len(), "Listed products");
            return Ok(products);
        };

        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let mut unique: Vec<&str> = codes.iter().map(String::as_str).collect();
        unique.sort_unstable();
        unique.dedup();

        debug!(requested = unique.len(), "Listing products by code");

        let mut ranked: Vec<RankedProduct> = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(CODES_PER_QUERY) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "SELECT rowid AS position, {PRODUCT_COLUMNS} FROM products WHERE code IN ("
            ));
            let mut separated = builder.separated(", ");
            for code in chunk {
                separated.push_bind(*code);
            }
            separated.push_unseparated(")");

            ranked.extend(
                builder
                    .build_query_as::<RankedProduct>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }

        ranked.sort_by_key(|row| row.position);
        debug!(count = ranked.len(), "Listed products by code");
        Ok(ranked.into_iter().map(|row| row.product).collect())
    }

    /// Gets a product by its code.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with this code
    pub async fn find(&self, code: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its code, failing with NotFound when absent.
    pub async fn get(&self, code: &str) -> DbResult<Product> {
        self.find(code)
            .await?
            .ok_or_else(|| DbError::not_found("Product", code))
    }

    /// Creates a product. Every field is required.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DbError::Core(..))` - A field is missing or out of range
    /// * `Err(DbError::UniqueViolation)` - The code already exists
    pub async fn create(&self, draft: ProductDraft) -> DbResult<Product> {
        let product = validate_new_product(draft)?;

        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                code, name, cost_cents, stock, sale_price_cents, unit_profit_cents
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.cost)
        .bind(product.stock)
        .bind(product.sale_price)
        .bind(product.unit_profit)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.code),
            other => other,
        })?;

        info!(code = %product.code, "Product created");
        Ok(product.into())
    }

    /// Applies a partial update. Absent fields (and a blank name) keep
    /// their current values.
    ///
    /// ## Returns
    /// * `Ok(())` - Update applied (possibly a no-op)
    /// * `Err(DbError::NotFound)` - No product with this code
    pub async fn update(&self, code: &str, update: ProductUpdate) -> DbResult<()> {
        let update = normalize_update(update)?;

        debug!(code = %code, ?update, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                cost_cents = COALESCE(?, cost_cents),
                stock = COALESCE(?, stock)
            WHERE code = ?
            "#,
        )
        .bind(update.name)
        .bind(update.cost)
        .bind(update.stock)
        .bind(code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", code));
        }

        info!(code = %code, "Product updated");
        Ok(())
    }

    /// Deletes a product. Sale lines referencing it are left in place.
    pub async fn delete(&self, code: &str) -> DbResult<()> {
        debug!(code = %code, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", code));
        }

        info!(code = %code, "Product deleted");
        Ok(())
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, product_draft as draft};
    use mercado_core::CoreError;

    async fn repo() -> ProductRepository {
        database().await.products()
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = repo().await;

        let created = repo.create(draft("A001", 10)).await.unwrap();
        let fetched = repo.get("A001").await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.cost.cents(), 700);
        assert_eq!(fetched.sale_price.cents(), 1000);
        assert_eq!(fetched.unit_profit.cents(), 300);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let repo = repo().await;
        repo.create(draft("A001", 10)).await.unwrap();

        let err = repo.create(draft("A001", 3)).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "code");
                assert_eq!(value, "A001");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        let repo = repo().await;
        let mut partial = draft("A001", 10);
        partial.sale_price = None;

        let err = repo.create(partial).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_stock_only_keeps_other_fields() {
        let repo = repo().await;
        repo.create(draft("A001", 10)).await.unwrap();

        repo.update(
            "A001",
            ProductUpdate {
                name: Some(String::new()),
                cost: None,
                stock: Some(4),
            },
        )
        .await
        .unwrap();

        let product = repo.get("A001").await.unwrap();
        assert_eq!(product.stock, 4);
        assert_eq!(product.name, "Produto A001");
        assert_eq!(product.cost.cents(), 700);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let repo = repo().await;

        let err = repo
            .update("X999", ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("X999").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_codes() {
        let repo = repo().await;
        for code in ["A001", "B002", "C003"] {
            repo.create(draft(code, 1)).await.unwrap();
        }

        assert_eq!(repo.list(None).await.unwrap().len(), 3);

        let wanted = vec!["C003".to_string(), "X999".to_string(), "A001".to_string()];
        let codes: Vec<String> = repo
            .list(Some(&wanted))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(codes, vec!["A001", "C003"]);

        assert!(repo.list(Some(&[])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_many_codes_keeps_insertion_order() {
        let repo = repo().await;
        repo.create(draft("Z001", 1)).await.unwrap();
        repo.create(draft("A001", 1)).await.unwrap();

        // More codes than SQLite binds in one statement, with duplicates.
        let mut wanted: Vec<String> = (0..40_000).map(|i| format!("F{i:05}")).collect();
        wanted.extend(["A001", "Z001", "A001"].map(String::from));

        let codes: Vec<String> = repo
            .list(Some(&wanted))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(codes, vec!["Z001", "A001"]);
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let repo = repo().await;
        repo.create(draft("A001", 1)).await.unwrap();

        repo.delete("A001").await.unwrap();
        assert!(repo.find("A001").await.unwrap().is_none());
    }
}
