//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::{Store, User};
use crate::models::user::{ADMIN_USERNAME, Role};
use crate::services::user_service::{UserError, UserService};

const MAX_USERNAME_LENGTH: usize = 50;

pub struct SeaOrmUserService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

fn validate_username(username: &str) -> Result<(), UserError> {
    if username.is_empty() {
        return Err(UserError::Validation("Username is required".to_string()));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserError::Validation(format!(
            "Username must be {MAX_USERNAME_LENGTH} characters or less"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(UserError::Validation(
            "Username can only contain letters, numbers, hyphens, underscores, and dots"
                .to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn create_user(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        role: Role,
    ) -> Result<User, UserError> {
        validate_username(username)?;

        let security = self.config.read().await.security.clone();
        if password.len() < security.min_password_length {
            return Err(UserError::Validation(format!(
                "Password must be at least {} characters",
                security.min_password_length
            )));
        }

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(UserError::DuplicateUsername(username.to_string()));
        }

        let user = self
            .store
            .insert_user(username, display_name, password, role, &security)
            .await
            .map_err(|e| {
                // Two concurrent creates can both pass the lookup above;
                // the unique index decides the loser.
                if e.to_string().contains("UNIQUE constraint") {
                    UserError::DuplicateUsername(username.to_string())
                } else {
                    UserError::Internal(e.to_string())
                }
            })?;

        tracing::info!(username, role = %role, "User created");

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn delete_user(&self, username: &str) -> Result<(), UserError> {
        if username == ADMIN_USERNAME {
            return Err(UserError::ProtectedAccount);
        }

        let deleted = self.store.delete_user(username).await?;
        if !deleted {
            return Err(UserError::NotFound(username.to_string()));
        }

        tracing::info!(username, "User deleted");

        Ok(())
    }
}
