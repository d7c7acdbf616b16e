//! Domain service for user management.
//!
//! Carries the account invariants: usernames are unique and the seeded
//! `admin` account can never be deleted.

use thiserror::Error;

use crate::db::User;
use crate::models::user::Role;

/// Errors specific to user management operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// The seeded admin account cannot be deleted. Surfaced as an
    /// explicit error rather than silently ignored.
    #[error("The admin account cannot be deleted")]
    ProtectedAccount,

    #[error("User '{0}' not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for user management.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates a new account with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateUsername`] if the username is taken.
    async fn create_user(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        role: Role,
    ) -> Result<User, UserError>;

    /// Lists all accounts' public fields in unspecified order.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::ProtectedAccount`] for the admin account and
    /// [`UserError::NotFound`] for unknown usernames.
    async fn delete_user(&self, username: &str) -> Result<(), UserError>;
}
