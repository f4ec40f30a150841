use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use bankdoc_models::User;
use bankdoc_utils::{hash_token, validate_bearer_token, BankdocError};

use crate::AppState;

/// The account behind a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BankdocError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| BankdocError::authentication("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| BankdocError::authentication("Invalid authorization header format"))?;
        validate_bearer_token(token)?;

        let stored = state
            .stores
            .users
            .find_token(&hash_token(token))
            .await?
            .ok_or_else(|| BankdocError::authentication("Could not validate credentials"))?;

        if stored.is_expired(Utc::now()) {
            return Err(BankdocError::authentication("Token has expired"));
        }

        let user = state
            .stores
            .users
            .find_user_by_id(stored.user_id)
            .await?
            .ok_or_else(|| BankdocError::authentication("Could not validate credentials"))?;

        tracing::debug!(user_id = %user.id, "Authenticated request");
        Ok(CurrentUser(user))
    }
}
