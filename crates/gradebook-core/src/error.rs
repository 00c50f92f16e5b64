//! Roster error types.
//!
//! Every failure a roster operation can report. None of them is fatal: after
//! any error the roster can be brought back in line with the service by a
//! re-fetch.

use thiserror::Error;

/// Errors that can occur while deriving, persisting or importing records.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A name or mark failed validation. No network call was made.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The remote service rejected or never answered a mutation.
    #[error("failed to {operation}: {message}")]
    PersistenceFailure { operation: String, message: String },

    /// Some, but not all, of a bulk delete went through.
    #[error("deleted {succeeded} of {requested} students")]
    PartialBulkFailure { succeeded: usize, requested: usize },

    /// The roster holds no record with this id.
    #[error("student not found: {0}")]
    NotFound(String),

    /// An import file could not be read at all.
    #[error("error importing CSV file: {0}")]
    Import(String),
}

impl RosterError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RosterError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn persistence(operation: &str, err: &anyhow::Error) -> Self {
        RosterError::PersistenceFailure {
            operation: operation.to_string(),
            message: format!("{err:#}"),
        }
    }
}
