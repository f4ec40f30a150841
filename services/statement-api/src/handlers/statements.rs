//! Bank Statement Handlers
//!
//! Upload and listing of the caller's bank statements.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};

use bankdoc_models::{BankStatement, ProcessStatementResponse};
use bankdoc_utils::{validate_file_size, BankdocError, BankdocResult};

use crate::{middleware::CurrentUser, AppState};

/// Multipart field carrying the PDF.
pub const UPLOAD_FIELD: &str = "bank_statement";

/// Upload and process a bank statement PDF
///
/// POST /api/v1/bank/process_bank_statement
pub async fn process_bank_statement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> (StatusCode, Json<ProcessStatementResponse>) {
    let result = async {
        let upload = read_upload(&mut multipart).await?;
        validate_file_size(upload.len() as u64, state.config.server.max_request_size as u64)?;
        state.pipeline.ingest(user.id, &upload).await
    }
    .await;

    match result {
        Ok(ingested) => {
            tracing::debug!(
                statement_id = %ingested.statement_id,
                content_hash = %ingested.content_hash,
                "Responding with extracted fields"
            );
            (
                StatusCode::CREATED,
                Json(ProcessStatementResponse::success(ingested.fields)),
            )
        }
        Err(e) => {
            let message = if e.is_duplicate() {
                "Bank statement with the same content already exists"
            } else {
                "Error processing bank statement"
            };
            (
                e.status(),
                Json(ProcessStatementResponse::error(message, Some(e.to_string()))),
            )
        }
    }
}

/// List the caller's statements by contract number
///
/// GET /api/v1/bank/get_bank_statements
pub async fn get_bank_statements(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<BankStatement>>, BankdocError> {
    let statements = state.stores.statements.list_by_owner(user.id).await?;
    tracing::debug!(user_id = %user.id, count = statements.len(), "Listed bank statements");
    Ok(Json(statements))
}

/// The `bank_statement` field, or else the first file field in the form.
async fn read_upload(multipart: &mut Multipart) -> BankdocResult<Vec<u8>> {
    let mut fallback = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BankdocError::validation(UPLOAD_FIELD, format!("Failed to read upload: {}", e)))?
    {
        let named = field.name() == Some(UPLOAD_FIELD);
        let is_file = field.file_name().is_some();
        if !named && (!is_file || fallback.is_some()) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| BankdocError::validation(UPLOAD_FIELD, format!("Failed to read file data: {}", e)))?;

        if named {
            return Ok(data.to_vec());
        }
        fallback = Some(data.to_vec());
    }

    fallback.ok_or_else(|| BankdocError::validation(UPLOAD_FIELD, "No file provided"))
}
