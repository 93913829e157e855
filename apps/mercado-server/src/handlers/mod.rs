//! # HTTP Handlers
//!
//! One module per resource. Each module owns its wire DTOs: Portuguese
//! keys, money as decimal major units, converted to core types on entry.

pub mod health;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod sales_lock;
pub mod user;

use chrono::NaiveDate;
use mercado_core::validation::parse_date;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

/// Confirmation body: `{"mensagem": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub mensagem: String,
}

impl Message {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Message {
            mensagem: mensagem.into(),
        }
    }
}

/// `?inicio=YYYY-MM-DD&fim=YYYY-MM-DD`. Both optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub inicio: Option<String>,
    pub fim: Option<String>,
}

impl PeriodQuery {
    /// Parses both bounds. An empty value counts as absent.
    pub fn bounds(&self) -> ApiResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        Ok((
            optional_date("inicio", self.inicio.as_deref())?,
            optional_date("fim", self.fim.as_deref())?,
        ))
    }
}

fn optional_date(field: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Ok(Some(parse_date(field, value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(inicio: Option<&str>, fim: Option<&str>) -> PeriodQuery {
        PeriodQuery {
            inicio: inicio.map(str::to_string),
            fim: fim.map(str::to_string),
        }
    }

    #[test]
    fn test_period_bounds() {
        let (start, end) = query(Some("2024-01-01"), Some("2024-01-31"))
            .bounds()
            .unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 31));

        assert_eq!(query(Some(""), None).bounds().unwrap(), (None, None));
        assert!(query(Some("31/01/2024"), None).bounds().is_err());
    }
}
