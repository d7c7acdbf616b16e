//! User management endpoints. All routes here sit behind the admin
//! middleware; business rules live in [`crate::services::UserService`].

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreateUserRequest, UserDto};
use crate::services::UserError;

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateUsername(username) => {
                Self::Conflict(format!("Username '{username}' already exists"))
            }
            UserError::ProtectedAccount => {
                Self::Forbidden("The admin account cannot be deleted".to_string())
            }
            UserError::NotFound(username) => {
                Self::NotFound(format!("User '{username}' not found"))
            }
            UserError::Validation(msg) => Self::ValidationError(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

/// GET /users
/// List all accounts' public fields
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list_users().await?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// POST /users
/// Create a new account
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let display_name = if payload.display_name.is_empty() {
        payload.username.clone()
    } else {
        payload.display_name
    };

    let user = state
        .user_service()
        .create_user(
            &payload.username,
            &display_name,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// DELETE /users/{username}
/// Delete an account. The seeded admin account is protected.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state.user_service().delete_user(&username).await?;

    Ok(Json(ApiResponse::success("User deleted")))
}
