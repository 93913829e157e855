//! # User Handlers
//!
//! Users carry a role tag (`operador` or `admin`). Passwords go in on
//! create and login, never out.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mercado_core::{Credentials, User, UserDraft, UserRole, ValidationError};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// `{id, nome, tipo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub nome: String,
    pub tipo: UserRole,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        UserDto {
            id: u.id,
            nome: u.name,
            tipo: u.role,
        }
    }
}

/// `{nome, senha, tipo}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub nome: Option<String>,
    pub senha: Option<String>,
    pub tipo: Option<String>,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(r: CreateUserRequest) -> Self {
        UserDraft {
            name: r.nome,
            password: r.senha,
            role: r.tipo,
        }
    }
}

/// `{nome, senha}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub nome: Option<String>,
    pub senha: Option<String>,
}

impl LoginRequest {
    fn into_credentials(self) -> Result<Credentials, ValidationError> {
        Ok(Credentials {
            name: self.nome.ok_or_else(|| ValidationError::required("nome"))?,
            password: self.senha.ok_or_else(|| ValidationError::required("senha"))?,
        })
    }
}

/// `{mensagem, tipo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub mensagem: String,
    pub tipo: UserRole,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /usuarios`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<UserDto>>> {
    let users = state
        .db
        .users()
        .list()
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao listar usuários"))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// `POST /usuarios`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let Json(body) = body?;

    state
        .db
        .users()
        .create(body.into())
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao cadastrar usuário"))?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Usuário cadastrado com sucesso!")),
    ))
}

/// `DELETE /usuarios/{id}`
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Message>> {
    let Path(id) = id?;

    state
        .db
        .users()
        .delete(id)
        .await
        .map_err(|e| ApiError::from(e).internal_as("Erro ao excluir usuário"))?;
    Ok(Json(Message::new("Usuário excluído com sucesso")))
}

/// `POST /login`: 200 with the role, or 401.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(body) = body?;
    let credentials = body.into_credentials()?;

    match state.db.users().login(&credentials).await? {
        Some(tipo) => Ok(Json(LoginResponse {
            mensagem: "Login bem-sucedido".to_string(),
            tipo,
        })),
        None => Err(ApiError::unauthorized("Usuário ou senha inválidos")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_shape_has_no_password() {
        let dto = UserDto::from(User {
            id: 1,
            name: "caixa".to_string(),
            role: UserRole::Operator,
        });
        assert_eq!(
            serde_json::to_value(dto).unwrap(),
            serde_json::json!({"id": 1, "nome": "caixa", "tipo": "operador"})
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest {
            nome: Some("ana".to_string()),
            senha: None,
        };
        assert!(matches!(
            req.into_credentials(),
            Err(ValidationError::Required { field }) if field == "senha"
        ));
    }
}
