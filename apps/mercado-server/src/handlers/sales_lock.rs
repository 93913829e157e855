//! # Sales Lock Handlers
//!
//! Reads and flips the advisory "stop selling" flag. Recording a sale does
//! not consult it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::Message;
use crate::error::ApiResult;
use crate::state::AppState;

/// `{bloqueado: bool}`, both as request and response.
///
/// A non-boolean value fails to decode and surfaces as INVALID_INPUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLockDto {
    pub bloqueado: bool,
}

/// `GET /bloquear-vendas`
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<SalesLockDto>> {
    let bloqueado = state.db.sales_lock().get().await?;
    Ok(Json(SalesLockDto { bloqueado }))
}

/// `POST /bloquear-vendas`
pub async fn set(
    State(state): State<AppState>,
    body: Result<Json<SalesLockDto>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(SalesLockDto { bloqueado }) = body?;

    state.db.sales_lock().set(bloqueado).await?;

    let mensagem = if bloqueado {
        "Vendas bloqueadas com sucesso!"
    } else {
        "Vendas liberadas com sucesso!"
    };
    Ok(Json(Message::new(mensagem)))
}
