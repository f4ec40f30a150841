use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Constraint names shared by the schema and the error classifier.
pub const STATEMENT_HASH_CONSTRAINT: &str = "bank_statements_content_hash_key";
pub const USER_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Why a statement's text did not fit the extraction template.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateError {
    #[error("line {line} required for field '{field}' is missing (text has {available} lines)")]
    MissingLine {
        field: String,
        line: usize,
        available: usize,
    },

    #[error("transaction marker '{marker}' not found in statement text")]
    MissingMarker { marker: String },
}

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BankdocError {
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("PDF extraction error: {message}")]
    Extraction { message: String },

    #[error("Statement layout error: {0}")]
    Template(#[from] TemplateError),

    #[error("Duplicate statement: {content_hash}")]
    Duplicate { content_hash: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl BankdocError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn duplicate(content_hash: impl Into<String>) -> Self {
        Self::Duplicate {
            content_hash: content_hash.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Template(_) => "TEMPLATE_MISMATCH",
            Self::Duplicate { .. } => "DUPLICATE_STATEMENT",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Io { .. } => 500,
            Self::Extraction { .. } => 422,
            Self::Template(_) => 422,
            Self::Duplicate { .. } => 409,
            Self::Database { .. } => 500,
            Self::Validation { .. } => 400,
            Self::Authentication { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub type BankdocResult<T> = Result<T, BankdocError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<BankdocError> for ErrorResponse {
    fn from(error: BankdocError) -> Self {
        let details = match &error {
            BankdocError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            BankdocError::Duplicate { content_hash } => {
                Some(serde_json::json!({ "content_hash": content_hash }))
            }
            _ => None,
        };

        Self {
            error: error.error_code().to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl IntoResponse for BankdocError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<std::io::Error> for BankdocError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for BankdocError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<validator::ValidationErrors> for BankdocError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation("request", crate::format_validation_errors(&errors))
    }
}

// Unique violations on the statement hash become Duplicate, on the email Conflict.
impl From<sqlx::Error> for BankdocError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
                match db_error.constraint() {
                    Some(STATEMENT_HASH_CONSTRAINT) => {
                        return Self::duplicate(db_error.message());
                    }
                    Some(USER_EMAIL_CONSTRAINT) => {
                        return Self::conflict("Email is already registered");
                    }
                    _ => {}
                }
            }
        }
        Self::database(error.to_string())
    }
}
