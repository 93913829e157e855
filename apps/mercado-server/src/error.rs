//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mercado POS                            │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /ajustar-estoque                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Handler: Result<Json<T>, ApiError>                              │   │
//! │  │         │                                                        │   │
//! │  │  Bad JSON?          ── JsonRejection ───────────┐                │   │
//! │  │  Ledger rule?       ── CoreError ───────────────┤                │   │
//! │  │  Store failure?     ── DbError ─────────────────┤                │   │
//! │  │                                                 ▼                │   │
//! │  │                                      ApiError { code, mensagem } │   │
//! │  └──────────────────────────────────────────────────┬───────────────┘   │
//! │                                                     │                   │
//! │  ◄──────────── 422 {"code":"INSUFFICIENT_STOCK", ...}                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their cause and reach the client only
//! as a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mercado_core::{CoreError, ValidationError};
use mercado_db::DbError;
use serde::Serialize;

/// Error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "mensagem": "Product not found: A001"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable message for display
    pub mensagem: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed input (400)
    InvalidInput,

    /// Duplicate product code or user name (409)
    Conflict,

    /// Unknown code or id (404)
    NotFound,

    /// Decrement exceeds available stock (422)
    InsufficientStock,

    /// Login rejected (401)
    Unauthorized,

    /// Unexpected store failure (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, mensagem: impl Into<String>) -> Self {
        ApiError {
            code,
            mensagem: mensagem.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(mensagem: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, mensagem)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(mensagem: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, mensagem)
    }

    /// Creates an internal error.
    pub fn internal(mensagem: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, mensagem)
    }

    /// Replaces the message of an internal error with an operation-level
    /// one. Other codes keep their detail.
    pub fn internal_as(self, mensagem: &str) -> Self {
        match self.code {
            ErrorCode::Internal => ApiError::internal(mensagem),
            _ => self,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Core(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::internal("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::internal("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::internal("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::internal("Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::internal("Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::internal("Database busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(code) => ApiError::not_found("Product", &code),
            err @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::EmptyBatch { what } => {
                ApiError::invalid_input(format!("{} must contain at least one item", what))
            }
            err @ CoreError::AmountOverflow { .. } => ApiError::invalid_input(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

/// Malformed bodies (wrong types, missing content type) are caller errors,
/// not the framework's default 415/422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_input(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_input(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::InvalidInput, StatusCode::BAD_REQUEST),
            (ErrorCode::Conflict, StatusCode::CONFLICT),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::InsufficientStock, StatusCode::UNPROCESSABLE_ENTITY),
            (ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(ApiError::new(code, "x").into_response().status(), status);
        }
    }

    #[test]
    fn test_db_errors() {
        let err = ApiError::from(DbError::duplicate("code", "A001"));
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = ApiError::from(DbError::not_found("User", "7"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.mensagem, "User not found: 7");

        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.mensagem.contains("disk"));
    }

    #[test]
    fn test_core_errors() {
        let err = ApiError::from(DbError::Core(CoreError::InsufficientStock {
            code: "A001".to_string(),
            available: 6,
            requested: 7,
        }));
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.mensagem.contains("A001"));

        let err = ApiError::from(CoreError::EmptyBatch {
            what: "items".to_string(),
        });
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = ApiError::from(CoreError::ProductNotFound("X999".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = ApiError::from(CoreError::AmountOverflow {
            what: "inventory value".to_string(),
        });
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.mensagem, "inventory value is too large to compute");
    }

    #[test]
    fn test_internal_as_only_rewrites_internal() {
        let err = ApiError::internal("Database transaction failed").internal_as("Erro ao registrar venda");
        assert_eq!(err.mensagem, "Erro ao registrar venda");

        let err = ApiError::invalid_input("total is required").internal_as("Erro ao registrar venda");
        assert_eq!(err.mensagem, "total is required");
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(ApiError::not_found("Product", "A001")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": "NOT_FOUND", "mensagem": "Product not found: A001"})
        );
    }
}
