//! Statement Field Extractor
//!
//! Applies an [`ExtractionTemplate`] to the text of a statement. Slicing is
//! purely positional: no trimming, no locale handling, no value validation.
//! A text that is too short for the template, or that lacks the transaction
//! marker, is rejected instead of yielding partial fields.

use bankdoc_models::StatementFields;

use super::template::ExtractionTemplate;
use crate::error::TemplateError;

pub struct FieldExtractor {
    template: ExtractionTemplate,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(ExtractionTemplate::standard())
    }
}

impl FieldExtractor {
    pub fn new(template: ExtractionTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &ExtractionTemplate {
        &self.template
    }

    pub fn extract(&self, text: &str) -> Result<StatementFields, TemplateError> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut fields = StatementFields::default();

        for rule in self.template.rules() {
            let line = lines.get(rule.line).ok_or_else(|| TemplateError::MissingLine {
                field: rule.field.to_string(),
                line: rule.line,
                available: lines.len(),
            })?;
            fields.set(rule.field, slice_from(line, rule.offset));
        }

        let marker = self.template.marker();
        let start = text.find(marker).ok_or_else(|| TemplateError::MissingMarker {
            marker: marker.to_string(),
        })?;
        fields.set(self.template.marker_field(), text[start..].to_string());

        tracing::debug!(
            template = self.template.name(),
            lines = lines.len(),
            "Extracted statement fields"
        );

        Ok(fields)
    }
}

/// Characters of `line` from `offset` on; empty when the line is shorter.
fn slice_from(line: &str, offset: usize) -> String {
    line.chars().skip(offset).collect()
}
