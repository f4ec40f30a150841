//! Statement Ingestion
//!
//! Orchestrates one upload: fingerprint, scratch write, text extraction,
//! field extraction, duplicate check and persistence.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use bankdoc_database::StatementStore;
use bankdoc_models::{NewBankStatement, StatementFields};
use bankdoc_utils::{
    fingerprint, BankdocError, BankdocResult, ContentHash, ExtractionTemplate, FieldExtractor,
};

use crate::metrics::{self, Outcome};
use crate::pdf_processor::{ScratchFile, TextExtractor};

/// A statement that was accepted and stored.
#[derive(Debug, Clone)]
pub struct IngestedStatement {
    pub statement_id: Uuid,
    pub content_hash: ContentHash,
    pub fields: StatementFields,
}

pub struct IngestionPipeline {
    statements: Arc<dyn StatementStore>,
    text_extractor: Arc<dyn TextExtractor>,
    field_extractor: FieldExtractor,
    scratch_dir: PathBuf,
}

impl IngestionPipeline {
    pub fn new(
        statements: Arc<dyn StatementStore>,
        text_extractor: Arc<dyn TextExtractor>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            statements,
            text_extractor,
            field_extractor: FieldExtractor::default(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn with_template(mut self, template: ExtractionTemplate) -> Self {
        self.field_extractor = FieldExtractor::new(template);
        self
    }

    /// Process one upload for `owner`. A statement whose bytes are already
    /// stored, for any owner, fails with `BankdocError::Duplicate`.
    pub async fn ingest(&self, owner: Uuid, upload: &[u8]) -> BankdocResult<IngestedStatement> {
        let content_hash = fingerprint(upload);
        let span = tracing::info_span!(
            "ingest_statement",
            user_id = %owner,
            content_hash = %content_hash,
            bytes = upload.len(),
        );

        let result = self.run(owner, upload, content_hash).instrument(span).await;
        let outcome = Outcome::of(&result);
        metrics::record_statement(outcome);

        if let Err(e) = &result {
            match outcome {
                Outcome::Rejected => tracing::warn!(user_id = %owner, error = %e, "Statement rejected"),
                Outcome::Failed => tracing::error!(user_id = %owner, error = %e, "Statement processing failed"),
                _ => {}
            }
        }
        result
    }

    async fn run(
        &self,
        owner: Uuid,
        upload: &[u8],
        content_hash: ContentHash,
    ) -> BankdocResult<IngestedStatement> {
        let scratch = ScratchFile::create(&self.scratch_dir, upload).await?;
        let text = self.extract_text(scratch).await?;

        let fields = self.field_extractor.extract(&text)?;
        tracing::debug!(template = self.field_extractor.template().name(), "Statement fields extracted");

        if !self.statements.find_by_hash(&content_hash).await?.is_empty() {
            tracing::warn!("Statement with the same content already stored");
            return Err(BankdocError::duplicate(content_hash.into_string()));
        }

        let stored = self
            .statements
            .insert(NewBankStatement {
                user_id: owner,
                content_hash: content_hash.as_str().to_string(),
                fields: fields.clone(),
            })
            .await?;

        tracing::info!(statement_id = %stored.id, "Bank statement stored");

        Ok(IngestedStatement {
            statement_id: stored.id,
            content_hash,
            fields,
        })
    }

    /// Parse on the blocking pool; the scratch file is removed there too,
    /// whether the parser returns or panics.
    async fn extract_text(&self, scratch: ScratchFile) -> BankdocResult<String> {
        let extractor = Arc::clone(&self.text_extractor);

        tokio::task::spawn_blocking(move || extractor.extract(scratch.path()))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    BankdocError::extraction("PDF parser panicked on this document")
                } else {
                    BankdocError::internal(format!("Text extraction task failed: {}", e))
                }
            })?
    }
}
