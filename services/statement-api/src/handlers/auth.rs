use axum::{extract::State, response::Json};
use chrono::{Duration, Utc};

use bankdoc_models::{AccessToken, AccessTokenRequest, AccessTokenResponse};
use bankdoc_utils::{issue_token, verify_password, BankdocError};

use crate::AppState;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Exchange email and password for a bearer token
///
/// POST /api/v1/auth/access-token
pub async fn issue_access_token(
    State(state): State<AppState>,
    Json(request): Json<AccessTokenRequest>,
) -> Result<Json<AccessTokenResponse>, BankdocError> {
    let email = request.email.trim().to_lowercase();
    let user = state
        .stores
        .users
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| BankdocError::authentication(BAD_CREDENTIALS))?;

    let password = request.password;
    let stored_hash = user.hashed_password.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| BankdocError::internal(format!("Password check task failed: {}", e)))??;
    if !verified {
        tracing::warn!(user_id = %user.id, "Rejected login attempt");
        return Err(BankdocError::authentication(BAD_CREDENTIALS));
    }

    let issued = issue_token();
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::minutes(state.config.auth.token_ttl_minutes);

    state
        .stores
        .users
        .store_token(AccessToken {
            token_hash: issued.token_hash,
            user_id: user.id,
            issued_at,
            expires_at,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Access token issued");
    Ok(Json(AccessTokenResponse {
        token_type: "bearer".to_string(),
        access_token: issued.secret,
        issued_at: issued_at.timestamp(),
        expires_at: expires_at.timestamp(),
    }))
}
