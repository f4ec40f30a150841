//! PDF Processor
//!
//! Writes uploads to a scratch file and extracts their text page by page.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bankdoc_utils::{BankdocError, BankdocResult};
use uuid::Uuid;

/// Upload bytes parked on disk for the parser. Removed when dropped; the
/// removal is a blocking call, so drop it off the async workers.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Write `data` to `<dir>/<uuid>.pdf`, creating `dir` if needed.
    pub async fn create(dir: &Path, data: &[u8]) -> BankdocResult<Self> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            BankdocError::io(format!("Error creating scratch directory {}: {}", dir.display(), e))
        })?;

        let path = dir.join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| BankdocError::io(format!("Error writing PDF file: {}", e)))?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Wrote scratch file");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed scratch file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove scratch file"
            ),
        }
    }
}

/// Turns a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> BankdocResult<String>;
}

/// `pdf-extract` starts every page's text with this.
const PAGE_PREFIX: &str = "\n\n";

/// Text layer extraction with `pdf-extract`. No OCR: image-only documents fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> BankdocResult<String> {
        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|e| BankdocError::extraction(format!("Failed to extract text from PDF: {}", e)))?;

        // Pages are joined with no separator; field offsets depend on it.
        let text: String = pages
            .iter()
            .map(|page| page.strip_prefix(PAGE_PREFIX).unwrap_or(page.as_str()))
            .collect();

        if text.trim().is_empty() {
            return Err(BankdocError::extraction(format!(
                "PDF has no text layer ({} page(s) without text)",
                pages.len()
            )));
        }

        tracing::debug!(pages = pages.len(), chars = text.chars().count(), "Extracted PDF text");
        Ok(text)
    }
}
