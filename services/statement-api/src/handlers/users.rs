use axum::{extract::State, http::StatusCode, response::Json};

use bankdoc_models::{NewUser, RegisterUserRequest, UserResponse};
use bankdoc_utils::{hash_password, validate_model, BankdocError};

use crate::{middleware::CurrentUser, AppState};

/// POST /api/v1/users/register
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), BankdocError> {
    validate_model(&request)?;

    let email = request.email.trim().to_lowercase();
    let password = request.password;
    let hashed_password = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| BankdocError::internal(format!("Password hashing task failed: {}", e)))??;

    let user = state
        .stores
        .users
        .create_user(NewUser {
            email,
            hashed_password,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/users/me
pub async fn read_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// DELETE /api/v1/users/me
pub async fn delete_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, BankdocError> {
    if !state.stores.users.delete_user(user.id).await? {
        return Err(BankdocError::not_found(format!("user {}", user.id)));
    }

    tracing::info!(user_id = %user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
