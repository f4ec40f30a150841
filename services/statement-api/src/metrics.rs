//! Prometheus counters for the ingestion pipeline.

use std::sync::LazyLock;

use bankdoc_utils::BankdocError;
use prometheus::{IntCounterVec, Opts};

static STATEMENTS_PROCESSED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "bankdoc_statements_processed_total",
            "Bank statement uploads by outcome",
        ),
        &["outcome"],
    )
    .expect("metric definition is valid");

    if let Err(e) = prometheus::register(Box::new(counter.clone())) {
        tracing::warn!(error = %e, "Failed to register statement counter");
    }
    counter
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Duplicate,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Duplicate => "duplicate",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }

    /// Duplicates are counted apart; unreadable or mismatching documents are
    /// "rejected"; anything else is a server-side failure.
    pub fn of(result: &Result<impl Sized, BankdocError>) -> Self {
        match result {
            Ok(_) => Outcome::Accepted,
            Err(BankdocError::Duplicate { .. }) => Outcome::Duplicate,
            Err(BankdocError::Extraction { .. }) | Err(BankdocError::Template(_)) => Outcome::Rejected,
            Err(_) => Outcome::Failed,
        }
    }
}

pub fn record_statement(outcome: Outcome) {
    STATEMENTS_PROCESSED
        .with_label_values(&[outcome.as_str()])
        .inc();
}
