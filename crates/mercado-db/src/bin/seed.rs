//! # Seed Data Generator
//!
//! Populates a development database with a small grocery catalog, an
//! `admin` user and a week of sample sales.
//!
//! ## Usage
//! ```bash
//! # Seed ./mercado_dev.db
//! cargo run -p mercado-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p mercado-db --bin seed -- --db ./data/mercado.db --admin-password trocar
//!
//! # Catalog and users only
//! cargo run -p mercado-db --bin seed -- --no-sales
//! ```
//!
//! ## Generated Products
//! Each product gets a code `{CATEGORY}{NNN}`, a cost, a sale price with a
//! 25-45% markup, the derived unit profit, and stock between 0 and 60.

use chrono::{Days, Utc};
use mercado_core::ledger::build_sale;
use mercado_core::{Money, Product, ProductDraft, SaleDraft, SaleLineDraft, UserDraft};
use mercado_db::{Database, DbConfig};
use std::env;

/// Product categories: (code prefix, [(name, cost in cents)])
const CATEGORIES: &[(&str, &[(&str, i64)])] = &[
    (
        "MER",
        &[
            ("Arroz Branco 5kg", 1890),
            ("Feijão Carioca 1kg", 699),
            ("Açúcar Refinado 1kg", 429),
            ("Café Torrado 500g", 1390),
            ("Óleo de Soja 900ml", 649),
            ("Macarrão Espaguete 500g", 389),
            ("Farinha de Trigo 1kg", 459),
            ("Sal Refinado 1kg", 199),
        ],
    ),
    (
        "BEB",
        &[
            ("Refrigerante Cola 2L", 679),
            ("Água Mineral 1,5L", 189),
            ("Suco de Laranja 1L", 749),
            ("Cerveja Lata 350ml", 329),
        ],
    ),
    (
        "LAT",
        &[
            ("Leite Integral 1L", 419),
            ("Queijo Mussarela kg", 3290),
            ("Manteiga 200g", 899),
            ("Iogurte Natural 170g", 239),
        ],
    ),
    (
        "LIM",
        &[
            ("Detergente 500ml", 189),
            ("Sabão em Pó 1kg", 1090),
            ("Água Sanitária 1L", 349),
            ("Papel Higiênico 12un", 1590),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./mercado_dev.db");
    let mut admin_password = String::from("admin");
    let mut with_sales = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-password" => {
                if i + 1 < args.len() {
                    admin_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--no-sales" => with_sales = false,
            "--help" | "-h" => {
                println!("Mercado POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>             Database file path (default: ./mercado_dev.db)");
                println!("      --admin-password <PW>   Password for the admin user (default: admin)");
                println!("      --no-sales              Skip the sample sales");
                println!("  -h, --help                  Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mercado POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    println!();
    println!("Generating products...");

    let mut products = Vec::new();
    for (category_idx, (prefix, items)) in CATEGORIES.iter().enumerate() {
        for (item_idx, (name, cost_cents)) in items.iter().enumerate() {
            let seed = category_idx * 100 + item_idx;
            let draft = generate_product(prefix, item_idx + 1, name, *cost_cents, seed);

            match db.products().create(draft).await {
                Ok(product) => products.push(product),
                Err(e) => eprintln!("Failed to insert {}: {}", name, e),
            }
        }
    }
    println!("✓ Generated {} products", products.len());

    // Users
    db.users()
        .create(UserDraft {
            name: Some("admin".to_string()),
            password: Some(admin_password),
            role: Some("admin".to_string()),
        })
        .await?;
    db.users()
        .create(UserDraft {
            name: Some("caixa".to_string()),
            password: Some("caixa".to_string()),
            role: Some("operador".to_string()),
        })
        .await?;
    println!("✓ Created users: admin, caixa");

    // Sales
    if with_sales && !products.is_empty() {
        let today = Utc::now().date_naive();
        let mut recorded = 0;

        for days_ago in 0..7u64 {
            let Some(date) = today.checked_sub_days(Days::new(days_ago)) else {
                continue;
            };
            let sale = build_sale(sample_sale(&products, days_ago as usize))?;
            db.sales().record_on(&sale, date).await?;
            recorded += 1;
        }
        println!("✓ Recorded {} sample sales", recorded);
    }

    let value = db.reports().total_inventory_value().await?;
    println!();
    println!("  Inventory value: {}", value);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a product with a deterministic markup and stock level.
fn generate_product(prefix: &str, index: usize, name: &str, cost_cents: i64, seed: usize) -> ProductDraft {
    let markup_pct = 25 + ((seed * 7) % 21) as i64;
    let cost = Money::from_cents(cost_cents);
    let sale_price = Money::from_cents(cost_cents + cost_cents * markup_pct / 100);

    ProductDraft {
        code: Some(format!("{}{:03}", prefix, index)),
        name: Some(name.to_string()),
        cost: Some(cost),
        stock: Some(((seed * 13) % 61) as i64),
        sale_price: Some(sale_price),
        unit_profit: Some(sale_price - cost),
    }
}

/// A three-line sale picked deterministically from the catalog.
fn sample_sale(products: &[Product], seed: usize) -> SaleDraft {
    let lines: Vec<SaleLineDraft> = (0..3)
        .map(|offset| {
            let product = &products[(seed * 5 + offset * 3) % products.len()];
            let quantity = 1 + ((seed + offset) % 3) as i64;
            SaleLineDraft {
                code: Some(product.code.clone()),
                quantity: Some(quantity),
                unit_value: Some(product.sale_price),
                subtotal: Some(product.sale_price * quantity),
                unit_profit: Some(product.unit_profit),
            }
        })
        .collect();

    let total = lines
        .iter()
        .filter_map(|line| line.subtotal)
        .sum::<Money>();

    SaleDraft {
        lines: Some(lines),
        total: Some(total),
    }
}
