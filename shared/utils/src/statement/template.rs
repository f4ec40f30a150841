//! Extraction Templates
//!
//! Declarative description of where each field lives in a statement's text:
//! an ordered list of `(field, line, offset)` rules plus the phrase that opens
//! the trailing transaction block.

use bankdoc_models::StatementField;

/// Phrase that opens the transaction block in the standard layout.
pub const TRANSACTION_MARKER: &str = "Транзакции Движение по счету";

/// Take `line` from character `offset` to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRule {
    pub field: StatementField,
    pub line: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTemplate {
    name: String,
    rules: Vec<LineRule>,
    marker: String,
    marker_field: StatementField,
}

impl ExtractionTemplate {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            marker: marker.into(),
            marker_field: StatementField::Transaction,
        }
    }

    pub fn with_rule(mut self, field: StatementField, line: usize, offset: usize) -> Self {
        self.rules.push(LineRule { field, line, offset });
        self
    }

    /// The single-page card statement layout this service was built for.
    pub fn standard() -> Self {
        Self::new("standard", TRANSACTION_MARKER)
            .with_rule(StatementField::StatementDate, 0, 47)
            .with_rule(StatementField::ClientName, 1, 29)
            .with_rule(StatementField::ContractNumber, 2, 16)
            .with_rule(StatementField::AccountNumber, 3, 12)
            .with_rule(StatementField::Card, 4, 6)
            .with_rule(StatementField::BranchOfTheBank, 5, 16)
            .with_rule(StatementField::MainCurrency, 7, 26)
            .with_rule(StatementField::Period, 8, 9)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn marker_field(&self) -> StatementField {
        self.marker_field
    }

    /// Number of lines a text needs before every rule can apply.
    pub fn min_lines(&self) -> usize {
        self.rules.iter().map(|rule| rule.line + 1).max().unwrap_or(0)
    }
}

impl Default for ExtractionTemplate {
    fn default() -> Self {
        Self::standard()
    }
}
