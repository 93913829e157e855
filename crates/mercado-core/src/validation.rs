//! # Validation Module
//!
//! Input validation utilities for Mercado POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                           │
//! │  └── Type validation (JSON deserialization → INVALID_INPUT)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + ledger rules                                    │
//! │  └── Required fields, ranges, formats. Runs before any mutation.        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK (stock >= 0, quantity > 0)                        │
//! │  └── UNIQUE (product code, user name)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_CODE_LEN, MAX_PRODUCT_NAME_LEN, MAX_STOCK, MAX_USER_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
///
/// ## Example
/// ```rust
/// use mercado_core::validation::validate_code;
///
/// assert!(validate_code("A001").is_ok());
/// assert!(validate_code("7891000100103").is_ok());
/// assert!(validate_code("  ").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    validate_text("code", code, MAX_CODE_LEN)
}

/// Validates a product name (non-blank, at most 200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a user display name (non-blank, at most 100 characters).
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_USER_NAME_LEN)
}

/// Validates a password. Only presence is checked.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being sold or deducted.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use mercado_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level: never negative, at most [`MAX_STOCK`].
pub fn validate_stock(field: &str, stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    if stock > MAX_STOCK {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_STOCK.to_string(),
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (giveaways), negative is not.
///
/// ## Example
/// ```rust
/// use mercado_core::money::Money;
/// use mercado_core::validation::validate_price;
///
/// assert!(validate_price("preco", Money::from_cents(1_000_000_000)).is_ok());
/// assert!(validate_price("preco", Money::from_cents(1_000_000_001)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    if price.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: Money::from_cents(MAX_AMOUNT_CENTS).to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a calendar day in ISO format (`YYYY-MM-DD`).
///
/// ## Example
/// ```rust
/// use mercado_core::validation::parse_date;
///
/// assert!(parse_date("inicio", "2024-03-01").is_ok());
/// assert!(parse_date("inicio", "01/03/2024").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
