//! # User Repository
//!
//! Named users with a role tag, and the login check.
//!
//! Passwords are stored and compared as plain text. Login is an equality
//! check on `(name, password)` and yields only the role.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use mercado_core::ledger::validate_new_user;
use mercado_core::validation::{validate_password, validate_user_name};
use mercado_core::{Credentials, User, UserDraft, UserRole};

/// Repository for users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user (without password)
    /// * `Err(DbError::Core(..))` - Missing field or unknown role
    /// * `Err(DbError::UniqueViolation)` - The name is taken
    pub async fn create(&self, draft: UserDraft) -> DbResult<User> {
        let user = validate_new_user(draft)?;

        debug!(name = %user.name, role = %user.role, "Inserting user");

        let id = sqlx::query("INSERT INTO users (name, password, role) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.password)
            .bind(user.role)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &user.name),
                other => other,
            })?
            .last_insert_rowid();

        info!(id, name = %user.name, "User created");
        Ok(User {
            id,
            name: user.name,
            role: user.role,
        })
    }

    /// Lists users by id. Passwords are never selected.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Deletes a user by id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        info!(id, "User deleted");
        Ok(())
    }

    /// Checks credentials.
    ///
    /// ## Returns
    /// * `Ok(Some(role))` - Name and password match
    /// * `Ok(None)` - No such user, or wrong password
    pub async fn login(&self, credentials: &Credentials) -> DbResult<Option<UserRole>> {
        validate_user_name(&credentials.name)?;
        validate_password(&credentials.password)?;

        let role: Option<UserRole> =
            sqlx::query_scalar("SELECT role FROM users WHERE name = ? AND password = ?")
                .bind(credentials.name.trim())
                .bind(&credentials.password)
                .fetch_optional(&self.pool)
                .await?;

        match role {
            Some(role) => info!(name = %credentials.name, %role, "Login accepted"),
            None => warn!(name = %credentials.name, "Login rejected"),
        }
        Ok(role)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::database;
    use mercado_core::CoreError;

    fn draft(name: &str, password: &str, role: &str) -> UserDraft {
        UserDraft {
            name: Some(name.to_string()),
            password: Some(password.to_string()),
            role: Some(role.to_string()),
        }
    }

    fn creds(name: &str, password: &str) -> Credentials {
        Credentials {
            name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_list_delete() {
        let db = database().await;
        let users = db.users();

        let ana = users.create(draft("ana", "s3cret", "admin")).await.unwrap();
        users.create(draft("bia", "1234", "operador")).await.unwrap();

        let listed = users.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], ana);
        assert_eq!(listed[1].role, UserRole::Operator);

        users.delete(ana.id).await.unwrap();
        assert_eq!(users.list().await.unwrap().len(), 1);

        let err = users.delete(ana.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let db = database().await;
        db.users().create(draft("ana", "a", "admin")).await.unwrap();

        let err = db
            .users()
            .create(draft("ana", "b", "operador"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_role() {
        let db = database().await;
        let err = db
            .users()
            .create(draft("ana", "a", "gerente"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_is_plain_equality() {
        let db = database().await;
        db.users().create(draft("ana", "s3cret", "admin")).await.unwrap();

        let role = db.users().login(&creds("ana", "s3cret")).await.unwrap();
        assert_eq!(role, Some(UserRole::Admin));

        assert_eq!(db.users().login(&creds("ana", "S3CRET")).await.unwrap(), None);
        assert_eq!(db.users().login(&creds("bia", "s3cret")).await.unwrap(), None);

        assert!(db.users().login(&creds("ana", "")).await.is_err());
    }
}
