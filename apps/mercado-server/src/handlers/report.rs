//! # Report Handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use mercado_core::money::decimal;
use mercado_core::{Money, ProfitSummary};
use serde::{Deserialize, Serialize};

use super::PeriodQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `{totalVendas, totalLucro}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummaryDto {
    #[serde(with = "decimal")]
    pub total_vendas: Money,
    #[serde(with = "decimal")]
    pub total_lucro: Money,
}

impl From<ProfitSummary> for ProfitSummaryDto {
    fn from(s: ProfitSummary) -> Self {
        ProfitSummaryDto {
            total_vendas: s.total_sales,
            total_lucro: s.total_profit,
        }
    }
}

/// `{totalEstoque}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValueDto {
    #[serde(with = "decimal")]
    pub total_estoque: Money,
}

/// `GET /lucro-vendas[?inicio=..&fim=..]`: filtered only when both bounds
/// are given.
pub async fn profit_summary(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<ProfitSummaryDto>> {
    let Query(query) = query?;
    let (start, end) = query.bounds()?;

    let summary = state
        .db
        .reports()
        .profit_summary(start, end)
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao buscar lucro das vendas"))?;
    Ok(Json(summary.into()))
}

/// `GET /total-estoque`
pub async fn inventory_value(State(state): State<AppState>) -> ApiResult<Json<InventoryValueDto>> {
    let total_estoque = state
        .db
        .reports()
        .total_inventory_value()
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao buscar total de estoque"))?;
    Ok(Json(InventoryValueDto { total_estoque }))
}
