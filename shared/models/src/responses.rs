use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{StatementFields, User};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub details: Option<String>,
}

/// Upload outcome: exactly one of `success` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessStatementResponse {
    pub success: Option<StatementFields>,
    pub error: Option<ErrorBody>,
}

impl ProcessStatementResponse {
    pub fn success(fields: StatementFields) -> Self {
        Self {
            success: Some(fields),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: None,
            error: Some(ErrorBody {
                message: message.into(),
                details,
            }),
        }
    }
}
