//! # Product Handlers
//!
//! Catalog CRUD keyed by product code.
//!
//! Wire shape: `{codigo, nome, preco, estoque, valorVenda, lucro}` where
//! `preco` is the unit cost and `lucro` the declared unit profit.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mercado_core::money::decimal;
use mercado_core::{Money, Product, ProductDraft, ProductUpdate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub codigo: String,
    pub nome: String,
    #[serde(with = "decimal")]
    pub preco: Money,
    pub estoque: i64,
    #[serde(with = "decimal")]
    pub valor_venda: Money,
    #[serde(with = "decimal")]
    pub lucro: Money,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            codigo: p.code,
            nome: p.name,
            preco: p.cost,
            estoque: p.stock,
            valor_venda: p.sale_price,
            lucro: p.unit_profit,
        }
    }
}

/// `POST /produtos` body. Every field is required; missing ones are
/// reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub codigo: Option<String>,
    pub nome: Option<String>,
    #[serde(default, with = "decimal::option")]
    pub preco: Option<Money>,
    pub estoque: Option<i64>,
    #[serde(default, with = "decimal::option")]
    pub valor_venda: Option<Money>,
    #[serde(default, with = "decimal::option")]
    pub lucro: Option<Money>,
}

impl From<CreateProductRequest> for ProductDraft {
    fn from(r: CreateProductRequest) -> Self {
        ProductDraft {
            code: r.codigo,
            name: r.nome,
            cost: r.preco,
            stock: r.estoque,
            sale_price: r.valor_venda,
            unit_profit: r.lucro,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub mensagem: String,
    pub codigo: String,
}

/// `PUT /produtos/{codigo}` body. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub nome: Option<String>,
    #[serde(default, with = "decimal::option")]
    pub preco: Option<Money>,
    pub estoque: Option<i64>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(r: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: r.nome,
            cost: r.preco,
            stock: r.estoque,
        }
    }
}

/// `?codigos=A001,B002`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub codigos: Option<String>,
}

impl ListQuery {
    /// Trimmed, non-empty codes, or `None` when the filter is absent or
    /// blank.
    pub fn codes(&self) -> Option<Vec<String>> {
        let codes: Vec<String> = self
            .codigos
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        if codes.is_empty() {
            None
        } else {
            Some(codes)
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /produtos[?codigos=...]`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductDto>>> {
    let Query(query) = query?;
    let codes = query.codes();
    debug!(?codes, "list products");

    let products = state.db.products().list(codes.as_deref()).await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `GET /produtos/{codigo}`
pub async fn get(
    State(state): State<AppState>,
    codigo: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ProductDto>> {
    let Path(codigo) = codigo?;
    let product = state.db.products().get(&codigo).await?;
    Ok(Json(product.into()))
}

/// `POST /produtos`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedProduct>)> {
    let Json(body) = body?;
    let product = state
        .db
        .products()
        .create(body.into())
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao adicionar produto"))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedProduct {
            mensagem: "Produto adicionado com sucesso!".to_string(),
            codigo: product.code,
        }),
    ))
}

/// `PUT /produtos/{codigo}`
pub async fn update(
    State(state): State<AppState>,
    codigo: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Path(codigo) = codigo?;
    let Json(body) = body?;

    state.db.products().update(&codigo, body.into()).await?;
    Ok(Json(Message::new("Produto atualizado com sucesso!")))
}

/// `DELETE /produtos/{codigo}`
pub async fn delete(
    State(state): State<AppState>,
    codigo: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Message>> {
    let Path(codigo) = codigo?;

    state.db.products().delete(&codigo).await?;
    Ok(Json(Message::new("Produto excluído com sucesso!")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_filter() {
        let query = |s: Option<&str>| ListQuery {
            codigos: s.map(str::to_string),
        };

        assert_eq!(query(None).codes(), None);
        assert_eq!(query(Some("")).codes(), None);
        assert_eq!(query(Some(" , ")).codes(), None);
        assert_eq!(
            query(Some("A001, B002,,C003 ")).codes(),
            Some(vec!["A001".to_string(), "B002".to_string(), "C003".to_string()])
        );
    }

    #[test]
    fn test_product_wire_shape() {
        let dto = ProductDto::from(Product {
            code: "A001".to_string(),
            name: "Arroz".to_string(),
            cost: Money::from_cents(700),
            stock: 10,
            sale_price: Money::from_cents(1050),
            unit_profit: Money::from_cents(350),
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "codigo": "A001",
                "nome": "Arroz",
                "preco": 7.0,
                "estoque": 10,
                "valorVenda": 10.5,
                "lucro": 3.5
            })
        );
    }

    #[test]
    fn test_create_request_with_missing_fields() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"codigo": "A001", "valorVenda": 10.5}"#).unwrap();
        let draft = ProductDraft::from(req);
        assert_eq!(draft.code.as_deref(), Some("A001"));
        assert_eq!(draft.sale_price, Some(Money::from_cents(1050)));
        assert!(draft.cost.is_none());
    }
}
