//! # Domain Types
//!
//! Core domain types used throughout Mercado POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  code (key)     │◄─┐│  id (auto)      │◄──│  sale_id (FK)   │        │
//! │  │  name           │  ││  date (day)     │   │  product_code ──┼──┐     │
//! │  │  cost           │  ││  total          │   │  quantity       │  │     │
//! │  │  stock (>= 0)   │  │└─────────────────┘   │  line_profit    │  │     │
//! │  │  sale_price     │  │                      └─────────────────┘  │     │
//! │  │  unit_profit    │  └───────────── soft reference ──────────────┘     │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │     User        │   │    UserRole     │                              │
//! │  │  id, name       │   │  Operator       │                              │
//! │  │  role           │   │  Admin          │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Drafts vs Validated Inputs
//! Requests arrive as `*Draft` types where every field is optional. The
//! [`crate::ledger`] rules turn a draft into its validated counterpart
//! (`NewProduct`, `NewSale`, ...) or reject it before anything is written.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
///
/// `code` is the identity key and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Business identifier (barcode or internal code).
    pub code: String,

    /// Display name.
    pub name: String,

    /// Unit cost price.
    pub cost: Money,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Unit sale price.
    pub sale_price: Money,

    /// Unit profit as declared by the catalog (may be negative).
    pub unit_profit: Money,
}

/// Unvalidated product creation request.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub code: Option<String>,
    pub name: Option<String>,
    pub cost: Option<Money>,
    pub stock: Option<i64>,
    pub sale_price: Option<Money>,
    pub unit_profit: Option<Money>,
}

/// Validated product, ready to insert. All six fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub cost: Money,
    pub stock: i64,
    pub sale_price: Money,
    pub unit_profit: Money,
}

impl From<NewProduct> for Product {
    fn from(p: NewProduct) -> Self {
        Product {
            code: p.code,
            name: p.name,
            cost: p.cost,
            stock: p.stock,
            sale_price: p.sale_price,
            unit_profit: p.unit_profit,
        }
    }
}

/// Partial product update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub cost: Option<Money>,
    pub stock: Option<i64>,
}

impl ProductUpdate {
    /// True when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cost.is_none() && self.stock.is_none()
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A physical count for one product (reconcile and diff input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCount {
    pub code: String,
    pub physical_qty: i64,
}

/// A relative stock reduction for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub code: String,
    pub quantity: i64,
}

/// Comparison of system stock against a physical count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockDiff {
    pub code: String,
    /// Product name, or `"not found"` for unknown codes.
    pub name: String,
    pub current_stock: i64,
    pub physical_stock: i64,
    /// `physical_stock - current_stock`.
    pub difference: i64,
    pub cost: Money,
    pub sale_price: Money,
    pub unit_profit: Money,
}

// =============================================================================
// Sales
// =============================================================================

/// A recorded sale header. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,

    /// Calendar day of the sale (server clock).
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Total as declared by the caller.
    pub total: Money,
}

/// One line of a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    /// Soft reference: the product may have been deleted since.
    pub product_code: String,
    pub quantity: i64,
    pub unit_value: Money,
    pub subtotal: Money,
    pub unit_profit: Money,
    /// `unit_profit × quantity`, computed at insert time.
    pub line_profit: Money,
}

/// A sale with its lines attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithLines {
    #[serde(flatten)]
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

/// Unvalidated sale line.
#[derive(Debug, Clone, Default)]
pub struct SaleLineDraft {
    pub code: Option<String>,
    pub quantity: Option<i64>,
    pub unit_value: Option<Money>,
    pub subtotal: Option<Money>,
    pub unit_profit: Option<Money>,
}

/// Unvalidated sale request.
#[derive(Debug, Clone, Default)]
pub struct SaleDraft {
    pub lines: Option<Vec<SaleLineDraft>>,
    pub total: Option<Money>,
}

/// Validated sale line with its server-computed line profit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSaleLine {
    pub code: String,
    pub quantity: i64,
    pub unit_value: Money,
    pub subtotal: Money,
    pub unit_profit: Money,
    pub line_profit: Money,
}

/// Validated sale, ready to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub lines: Vec<NewSaleLine>,
    pub total: Money,
}

// =============================================================================
// Reporting
// =============================================================================

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The single-day window `[day, day]`.
    pub fn day(day: NaiveDate) -> Self {
        DateRange {
            start: day,
            end: day,
        }
    }

    /// Whether `day` falls inside the window (both ends inclusive).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Sum of sale totals and of line profits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitSummary {
    pub total_sales: Money,
    pub total_profit: Money,
}

// =============================================================================
// Users
// =============================================================================

/// Role tag attached to a user.
///
/// Stored as `operator`/`admin`. The store's clients send `operador`, so
/// that is the serde name, with `operator` accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum UserRole {
    #[serde(rename = "operador", alias = "operator")]
    Operator,
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    /// Wire tag for this role.
    pub fn as_tag(&self) -> &'static str {
        match self {
            UserRole::Operator => "operador",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "operador" | "operator" => Ok(UserRole::Operator),
            "admin" => Ok(UserRole::Admin),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["operador".to_string(), "admin".to_string()],
            }),
        }
    }
}

/// A user as listed. The password never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: UserRole,
}

/// Unvalidated user creation request. `role` is the raw tag.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Validated user creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

/// Name and password presented at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("operador".parse::<UserRole>().unwrap(), UserRole::Operator);
        assert_eq!("operator".parse::<UserRole>().unwrap(), UserRole::Operator);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!(matches!(
            "gerente".parse::<UserRole>(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_role_serde_tags() {
        assert_eq!(serde_json::to_string(&UserRole::Operator).unwrap(), "\"operador\"");
        let role: UserRole = serde_json::from_str("\"operator\"").unwrap();
        assert_eq!(role, UserRole::Operator);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let range = DateRange { start, end };

        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert!(DateRange::day(start).contains(start));
    }

    #[test]
    fn test_product_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());
        let update = ProductUpdate {
            stock: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
