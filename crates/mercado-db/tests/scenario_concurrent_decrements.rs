//! Concurrent decrement batches against one product on a file-backed
//! database (real pool, several connections).
//!
//! Stock never goes negative and every unit is accounted for: the
//! conditional `UPDATE ... WHERE stock >= ?` lets exactly as many batches
//! through as the stock allows.

use mercado_core::{CoreError, Money, ProductDraft, StockDecrement};
use mercado_db::{Database, DbConfig, DbError};

async fn file_database(dir: &tempfile::TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("mercado.db")).max_connections(5);
    Database::new(config).await.expect("open file database")
}

fn product(code: &str, stock: i64) -> ProductDraft {
    ProductDraft {
        code: Some(code.to_string()),
        name: Some(format!("Produto {code}")),
        cost: Some(Money::from_cents(500)),
        stock: Some(stock),
        sale_price: Some(Money::from_cents(800)),
        unit_profit: Some(Money::from_cents(300)),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_never_oversell() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = file_database(&dir).await;
    db.products().create(product("A001", 10)).await.expect("create");

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                db.inventory()
                    .decrement(&[StockDecrement {
                        code: "A001".to_string(),
                        quantity: 3,
                    }])
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(()) => succeeded += 1,
            Err(DbError::Core(CoreError::InsufficientStock { .. })) => short += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(short, 7);
    assert_eq!(db.products().get("A001").await.expect("get").stock, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_batch_leaves_concurrent_successes_intact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = file_database(&dir).await;
    db.products().create(product("A001", 10)).await.expect("create A001");
    db.products().create(product("B002", 10)).await.expect("create B002");

    // Each batch takes 1 of A001, then asks for an unknown code: all fail.
    let failing: Vec<_> = (0..5)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                db.inventory()
                    .decrement(&[
                        StockDecrement {
                            code: "A001".to_string(),
                            quantity: 1,
                        },
                        StockDecrement {
                            code: "X999".to_string(),
                            quantity: 1,
                        },
                    ])
                    .await
            })
        })
        .collect();

    let passing: Vec<_> = (0..5)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                db.inventory()
                    .decrement(&[StockDecrement {
                        code: "B002".to_string(),
                        quantity: 2,
                    }])
                    .await
            })
        })
        .collect();

    for handle in failing {
        let result = handle.await.expect("task panicked");
        assert!(matches!(
            result,
            Err(DbError::Core(CoreError::ProductNotFound(_)))
        ));
    }
    for handle in passing {
        handle.await.expect("task panicked").expect("decrement");
    }

    assert_eq!(db.products().get("A001").await.expect("get").stock, 10);
    assert_eq!(db.products().get("B002").await.expect("get").stock, 0);
}
