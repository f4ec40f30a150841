//! Bank Statement Text Processing
//!
//! Positional field extraction for statements whose text follows a known,
//! fixed layout.

pub mod template;
pub mod extractor;

pub use template::{ExtractionTemplate, LineRule, TRANSACTION_MARKER};
pub use extractor::FieldExtractor;
