//! # Sale Handlers
//!
//! Recording a sale writes the header and its lines in one unit of work.
//! It does not touch stock: cashier clients follow up with
//! `POST /ajustar-estoque`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use mercado_core::ledger::build_sale;
use mercado_core::money::decimal;
use mercado_core::{Money, SaleDraft, SaleLine, SaleLineDraft, SaleWithLines};
use serde::{Deserialize, Serialize};

use super::{Message, PeriodQuery};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// `{id, data, total, itens: [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDto {
    pub id: i64,
    pub data: NaiveDate,
    #[serde(with = "decimal")]
    pub total: Money,
    pub itens: Vec<SaleItemDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemDto {
    pub codigo: String,
    pub quantidade: i64,
    #[serde(with = "decimal")]
    pub valor: Money,
    #[serde(with = "decimal")]
    pub subtotal: Money,
}

impl From<SaleLine> for SaleItemDto {
    fn from(line: SaleLine) -> Self {
        SaleItemDto {
            codigo: line.product_code,
            quantidade: line.quantity,
            valor: line.unit_value,
            subtotal: line.subtotal,
        }
    }
}

impl From<SaleWithLines> for SaleDto {
    fn from(s: SaleWithLines) -> Self {
        SaleDto {
            id: s.sale.id,
            data: s.sale.date,
            total: s.sale.total,
            itens: s.lines.into_iter().map(SaleItemDto::from).collect(),
        }
    }
}

/// `{itens: [{codigo, quantidade, valor, subtotal, lucro}], total}`
///
/// `lucro` is the unit profit; the line profit is always recomputed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordSaleRequest {
    pub itens: Option<Vec<RecordSaleItem>>,
    #[serde(default, with = "decimal::option")]
    pub total: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordSaleItem {
    pub codigo: Option<String>,
    pub quantidade: Option<i64>,
    #[serde(default, with = "decimal::option")]
    pub valor: Option<Money>,
    #[serde(default, with = "decimal::option")]
    pub subtotal: Option<Money>,
    #[serde(default, with = "decimal::option")]
    pub lucro: Option<Money>,
}

impl From<RecordSaleRequest> for SaleDraft {
    fn from(r: RecordSaleRequest) -> Self {
        SaleDraft {
            lines: r.itens.map(|items| {
                items
                    .into_iter()
                    .map(|item| SaleLineDraft {
                        code: item.codigo,
                        quantity: item.quantidade,
                        unit_value: item.valor,
                        subtotal: item.subtotal,
                        unit_profit: item.lucro,
                    })
                    .collect()
            }),
            total: r.total,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /vendas[?inicio=..&fim=..]`: the inclusive range when both bounds
/// are given, today otherwise.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SaleDto>>> {
    let Query(query) = query?;
    let (start, end) = query.bounds()?;

    let sales = state
        .db
        .sales()
        .list(start, end)
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao buscar vendas"))?;
    Ok(Json(sales.into_iter().map(SaleDto::from).collect()))
}

/// `GET /vendas/{id}`
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<SaleDto>> {
    let Path(id) = id?;
    let sale = state.db.sales().get(id).await?;
    Ok(Json(sale.into()))
}

/// `POST /vendas`
pub async fn record(
    State(state): State<AppState>,
    body: Result<Json<RecordSaleRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(body) = body?;
    let sale = build_sale(body.into())?;

    state
        .db
        .sales()
        .record(&sale)
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao registrar venda"))?;
    Ok(Json(Message::new("Venda registrada com sucesso")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_maps_every_field() {
        let req: RecordSaleRequest = serde_json::from_str(
            r#"{"itens": [{"codigo": "A001", "quantidade": 2, "valor": 10, "subtotal": 20, "lucro": 3}], "total": 20}"#,
        )
        .unwrap();

        let sale = build_sale(req.into()).unwrap();
        assert_eq!(sale.total.cents(), 2000);
        assert_eq!(sale.lines[0].line_profit.cents(), 600);
    }

    #[test]
    fn test_record_request_without_total_is_rejected() {
        let req: RecordSaleRequest =
            serde_json::from_str(r#"{"itens": [{"codigo": "A001"}]}"#).unwrap();
        assert!(build_sale(req.into()).is_err());
    }
}
