//! # Ledger Rules
//!
//! Pure rules that keep stock, sales and profit figures consistent.
//! Everything here runs BEFORE the database is touched; the database layer
//! only executes plans that already passed these checks.
//!
//! ## Where Each Rule Applies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Rule (this module)          Unit of work (db)     │
//! │  ───────────────────  ──────────────────────────  ───────────────────── │
//! │  create product       validate_new_product        INSERT                │
//! │  update product       normalize_update            UPDATE ... COALESCE   │
//! │  decrement stock      validate_decrements         BEGIN; UPDATE...; END │
//! │  reconcile stock      validate_counts             BEGIN; UPDATE...; END │
//! │  stock diff           stock_diff                  (read only)           │
//! │  record sale          build_sale                  BEGIN; INSERTs; END   │
//! │  sales in range       sales_window                (read only)           │
//! │  profit summary       profit_window               (read only)           │
//! │  create user          validate_new_user           INSERT                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    DateRange, NewProduct, NewSale, NewSaleLine, NewUser, Product, ProductDraft, ProductUpdate,
    SaleDraft, StockCount, StockDecrement, StockDiff, UserDraft, UserRole,
};
use crate::validation::{
    validate_code, validate_password, validate_price, validate_product_name, validate_quantity,
    validate_stock, validate_user_name,
};

/// Name reported by [`stock_diff`] for codes missing from the catalog.
pub const UNKNOWN_PRODUCT_NAME: &str = "not found";

// =============================================================================
// Catalog
// =============================================================================

/// Validates a creation request. All six fields are required.
///
/// ## Example
/// ```rust
/// use mercado_core::ledger::validate_new_product;
/// use mercado_core::money::Money;
/// use mercado_core::types::ProductDraft;
///
/// let draft = ProductDraft {
///     code: Some("A001".into()),
///     name: Some("Arroz 5kg".into()),
///     cost: Some(Money::from_cents(1800)),
///     stock: Some(10),
///     sale_price: Some(Money::from_cents(2500)),
///     unit_profit: Some(Money::from_cents(700)),
/// };
/// assert!(validate_new_product(draft).is_ok());
///
/// let partial = ProductDraft { code: Some("A002".into()), ..Default::default() };
/// assert!(validate_new_product(partial).is_err());
/// ```
pub fn validate_new_product(draft: ProductDraft) -> CoreResult<NewProduct> {
    let code = required(draft.code, "code")?;
    let name = required(draft.name, "name")?;
    let cost = required(draft.cost, "cost")?;
    let stock = required(draft.stock, "stock")?;
    let sale_price = required(draft.sale_price, "sale_price")?;
    let unit_profit = required(draft.unit_profit, "unit_profit")?;

    validate_code(&code)?;
    validate_product_name(&name)?;
    validate_price("cost", cost)?;
    validate_stock("stock", stock)?;
    validate_price("sale_price", sale_price)?;

    Ok(NewProduct {
        code: code.trim().to_string(),
        name: name.trim().to_string(),
        cost,
        stock,
        sale_price,
        unit_profit,
    })
}

/// Normalizes a partial update.
///
/// A blank name means "keep current", same as an absent one.
pub fn normalize_update(update: ProductUpdate) -> CoreResult<ProductUpdate> {
    let name = match update.name {
        Some(name) if name.trim().is_empty() => None,
        Some(name) => {
            validate_product_name(&name)?;
            Some(name.trim().to_string())
        }
        None => None,
    };

    if let Some(cost) = update.cost {
        validate_price("cost", cost)?;
    }
    if let Some(stock) = update.stock {
        validate_stock("stock", stock)?;
    }

    Ok(ProductUpdate {
        name,
        cost: update.cost,
        stock: update.stock,
    })
}

// =============================================================================
// Inventory
// =============================================================================

/// Checks a decrement batch. The batch must not be empty and every
/// quantity must be positive.
pub fn validate_decrements(items: &[StockDecrement]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::EmptyBatch {
            what: "items".to_string(),
        });
    }

    for item in items {
        validate_code(&item.code)?;
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

/// Checks a reconcile batch. Empty is allowed (no-op).
pub fn validate_counts(items: &[StockCount]) -> CoreResult<()> {
    for item in items {
        validate_code(&item.code)?;
        validate_stock("physical_qty", item.physical_qty)?;
    }
    Ok(())
}

/// Compares a physical count against the catalog entry, if there is one.
///
/// Never fails: unknown codes report [`UNKNOWN_PRODUCT_NAME`] with zero
/// stock and zero prices.
///
/// ## Example
/// ```rust
/// use mercado_core::ledger::stock_diff;
/// use mercado_core::types::StockCount;
///
/// let count = StockCount { code: "X999".into(), physical_qty: 5 };
/// let diff = stock_diff(&count, None);
/// assert_eq!(diff.name, "not found");
/// assert_eq!(diff.difference, 5);
/// ```
pub fn stock_diff(count: &StockCount, product: Option<&Product>) -> StockDiff {
    match product {
        Some(p) => StockDiff {
            code: count.code.clone(),
            name: p.name.clone(),
            current_stock: p.stock,
            physical_stock: count.physical_qty,
            difference: count.physical_qty - p.stock,
            cost: p.cost,
            sale_price: p.sale_price,
            unit_profit: p.unit_profit,
        },
        None => StockDiff {
            code: count.code.clone(),
            name: UNKNOWN_PRODUCT_NAME.to_string(),
            current_stock: 0,
            physical_stock: count.physical_qty,
            difference: count.physical_qty,
            cost: Money::zero(),
            sale_price: Money::zero(),
            unit_profit: Money::zero(),
        },
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Validates a sale request and computes each line's profit.
///
/// ## User Workflow
/// ```text
/// Line {A001, qty 2, value 10.00, subtotal 20.00, unit profit 3.00}
///      │
///      ▼
/// build_sale ← THIS FUNCTION
///      │  every field present, qty > 0, amounts >= 0
///      ▼
/// NewSaleLine { line_profit: 6.00 }   (3.00 × 2, always recomputed)
/// ```
///
/// Subtotals are kept as declared; the total is not checked against them.
pub fn build_sale(draft: SaleDraft) -> CoreResult<NewSale> {
    let lines = required(draft.lines, "items")?;
    let total = required(draft.total, "total")?;

    if lines.is_empty() {
        return Err(CoreError::EmptyBatch {
            what: "items".to_string(),
        });
    }
    validate_price("total", total)?;

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let field = |name: &str| format!("items[{i}].{name}");

            let code = required(line.code, &field("code"))?;
            let quantity = required(line.quantity, &field("quantity"))?;
            let unit_value = required(line.unit_value, &field("unit_value"))?;
            let subtotal = required(line.subtotal, &field("subtotal"))?;
            let unit_profit = required(line.unit_profit, &field("unit_profit"))?;

            validate_code(&code)?;
            validate_quantity(quantity)?;
            validate_price(&field("unit_value"), unit_value)?;
            validate_price(&field("subtotal"), subtotal)?;

            let line_profit = unit_profit.checked_mul_quantity(quantity).ok_or_else(|| {
                ValidationError::InvalidFormat {
                    field: field("quantity"),
                    reason: "line profit does not fit in the ledger".to_string(),
                }
            })?;

            Ok(NewSaleLine {
                code: code.trim().to_string(),
                quantity,
                unit_value,
                subtotal,
                unit_profit,
                line_profit,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(NewSale { lines, total })
}

// =============================================================================
// Reporting Windows
// =============================================================================

/// Window for listing sales: the given bounds when both are present,
/// otherwise `today` only.
pub fn sales_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> DateRange {
    match (start, end) {
        (Some(start), Some(end)) => DateRange { start, end },
        _ => DateRange::day(today),
    }
}

/// Window for the profit summary: filtered only when both bounds are
/// present, all time otherwise.
pub fn profit_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
    match (start, end) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    }
}

// =============================================================================
// Users
// =============================================================================

/// Validates a user creation request: name, password and role are all
/// required and the role must be a known tag.
pub fn validate_new_user(draft: UserDraft) -> CoreResult<NewUser> {
    let name = required(draft.name, "name")?;
    let password = required(draft.password, "password")?;
    let role = required(draft.role, "role")?;

    validate_user_name(&name)?;
    validate_password(&password)?;
    let role: UserRole = role.parse()?;

    Ok(NewUser {
        name: name.trim().to_string(),
        password,
        role,
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}

// =============================================================================
// Unit Tests
// =============================================================================
