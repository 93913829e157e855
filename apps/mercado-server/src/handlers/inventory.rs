//! # Inventory Handlers
//!
//! - `POST /conferir-inventario`: compare physical counts with the catalog
//!   (read-only)
//! - `POST /ajustar-inventario`: overwrite stock with physical counts
//! - `POST /ajustar-estoque`: atomic relative decrement of a batch

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mercado_core::money::decimal;
use mercado_core::{Money, StockCount, StockDecrement, StockDiff, ValidationError};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// `{produtos: [{codigo, quantidadeFisica}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffRequest {
    pub produtos: Option<Vec<DiffItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffItem {
    pub codigo: String,
    /// Absent counts as zero.
    pub quantidade_fisica: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDiffDto {
    pub codigo: String,
    pub nome: String,
    pub estoque_atual: i64,
    pub estoque_fisico: i64,
    pub diferenca: i64,
    #[serde(with = "decimal")]
    pub preco: Money,
    #[serde(with = "decimal")]
    pub valor_venda: Money,
    #[serde(with = "decimal")]
    pub lucro: Money,
}

impl From<StockDiff> for StockDiffDto {
    fn from(d: StockDiff) -> Self {
        StockDiffDto {
            codigo: d.code,
            nome: d.name,
            estoque_atual: d.current_stock,
            estoque_fisico: d.physical_stock,
            diferenca: d.difference,
            preco: d.cost,
            valor_venda: d.sale_price,
            lucro: d.unit_profit,
        }
    }
}

/// `{produtos: [{codigo, estoqueFisico}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileRequest {
    pub produtos: Option<Vec<ReconcileItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileItem {
    pub codigo: Option<String>,
    pub estoque_fisico: Option<i64>,
}

/// `{itens: [{codigo, quantidade}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecrementRequest {
    pub itens: Option<Vec<DecrementItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecrementItem {
    pub codigo: Option<String>,
    pub quantidade: Option<i64>,
}

impl DiffRequest {
    fn into_counts(self) -> ApiResult<Vec<StockCount>> {
        let items = self
            .produtos
            .ok_or_else(|| ValidationError::required("produtos"))?;

        Ok(items
            .into_iter()
            .map(|item| StockCount {
                code: item.codigo,
                physical_qty: item.quantidade_fisica.unwrap_or(0),
            })
            .collect())
    }
}

impl ReconcileRequest {
    fn into_counts(self) -> ApiResult<Vec<StockCount>> {
        let items = self
            .produtos
            .ok_or_else(|| ValidationError::required("produtos"))?;

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Ok::<_, ApiError>(StockCount {
                    code: item
                        .codigo
                        .ok_or_else(|| ValidationError::required(format!("produtos[{i}].codigo")))?,
                    physical_qty: item.estoque_fisico.ok_or_else(|| {
                        ValidationError::required(format!("produtos[{i}].estoqueFisico"))
                    })?,
                })
            })
            .collect()
    }
}

impl DecrementRequest {
    /// An absent list decodes as empty, which the ledger rejects.
    fn into_items(self) -> ApiResult<Vec<StockDecrement>> {
        self.itens
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Ok::<_, ApiError>(StockDecrement {
                    code: item
                        .codigo
                        .ok_or_else(|| ValidationError::required(format!("itens[{i}].codigo")))?,
                    quantity: item.quantidade.ok_or_else(|| {
                        ValidationError::required(format!("itens[{i}].quantidade"))
                    })?,
                })
            })
            .collect()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /conferir-inventario`
pub async fn diff(
    State(state): State<AppState>,
    body: Result<Json<DiffRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<StockDiffDto>>> {
    let Json(body) = body?;
    let counts = body.into_counts()?;

    let diffs = state.db.inventory().diff(&counts).await?;
    Ok(Json(diffs.into_iter().map(StockDiffDto::from).collect()))
}

/// `POST /ajustar-inventario`
pub async fn reconcile(
    State(state): State<AppState>,
    body: Result<Json<ReconcileRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(body) = body?;
    let counts = body.into_counts()?;

    state
        .db
        .inventory()
        .reconcile(&counts)
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao ajustar inventário"))?;
    Ok(Json(Message::new("Inventário ajustado com sucesso!")))
}

/// `POST /ajustar-estoque`
pub async fn decrement(
    State(state): State<AppState>,
    body: Result<Json<DecrementRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(body) = body?;
    let items = body.into_items()?;

    state.db.inventory().decrement(&items).await?;
    Ok(Json(Message::new("Estoque atualizado com sucesso")))
}
