//! Crate error types.
//!
//! Configuration problems are detected up front and reported together;
//! a simulation that cannot finish inside its day cap is a distinct
//! failure rather than a truncated result.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by estimation and calendar operations.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Input failed validation. Nothing was computed.
    #[error("invalid configuration: {}", join_messages(.0))]
    Configuration(Vec<ValidationError>),

    /// The flow-shop simulation did not complete every job within the cap.
    #[error("simulation exceeded {max_days} days with {completed}/{total} jobs completed")]
    SimulationOverrun {
        max_days: u32,
        completed: usize,
        total: usize,
    },

    /// A business-day offset was requested with a negative count.
    #[error("work day count must not be negative, got {0}")]
    NegativeWorkDays(i64),

    /// Date arithmetic left chrono's representable range.
    #[error("date out of range while advancing from {0}")]
    DateOutOfRange(chrono::NaiveDate),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The record store failed while loading inputs.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("record '{id}' not found in '{collection}'")]
    RecordNotFound { collection: String, id: String },

    #[error("store rejected the request: {0}")]
    Rejected(String),
}

/// A single job's write-back failure. Other writes in the batch proceed.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("failed to write job '{job_id}': {source}")]
pub struct PerRecordWriteError {
    /// Job whose record was not written.
    pub job_id: String,
    /// Store failure.
    #[source]
    pub source: StoreError,
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, EstimateError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl EstimateError {
    /// Whether this is a configuration (input) failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Validation issues carried by a configuration failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Configuration(errors) => errors,
            _ => &[],
        }
    }
}
