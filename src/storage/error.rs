//! Error types for store operations.

use rusqlite::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

use super::condition::ConditionError;

/// Broad classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing file could not be opened or set up.
    Connectivity,
    /// A write violated a constraint (foreign key, NOT NULL, primary key).
    Constraint,
    /// The caller supplied an unusable table, column, value set or condition.
    InvalidInput,
    /// Any other database failure.
    Database,
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Unknown table: {0:?}")]
    UnknownTable(String),

    #[error("Unknown column {column:?} for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid condition: {0}")]
    Condition(#[from] ConditionError),
}

impl StoreError {
    /// Classify the error so callers can branch on the outcome.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::Connectivity,
            Self::Database(err) => match err.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => ErrorKind::Constraint,
                Some(
                    ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::PermissionDenied
                    | ErrorCode::ReadOnly
                    | ErrorCode::SystemIoFailure,
                ) => ErrorKind::Connectivity,
                _ => ErrorKind::Database,
            },
            Self::UnknownTable(_)
            | Self::UnknownColumn { .. }
            | Self::InvalidInput(_)
            | Self::Condition(_) => ErrorKind::InvalidInput,
        }
    }
}
