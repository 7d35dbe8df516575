use thiserror::Error;

use crate::schema::DataType;

/// Canonical result for core and the operators built on it.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A selector or argument referenced a column (or position) that does not exist.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("selection resolved to no columns")]
    EmptySelection,

    #[error("duplicate key '{key}' in group {group} (rows {first_row} and {second_row})")]
    DuplicateKeyInGroup {
        group: String,
        key: String,
        first_row: usize,
        second_row: usize,
    },

    #[error("row {row}: expected {expected} pieces, found {found}")]
    TooManyPieces {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: expected {expected} pieces, found {found}")]
    TooFewPieces {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} split positions, found {found}")]
    InvalidPositionCount { expected: usize, found: usize },

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' is {expected} but holds a {found} value")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("cannot cast {from} to {to}")]
    Cast { from: DataType, to: DataType },

    #[error("hashing error: {0}")]
    Hash(String),

    #[error("internal invariant failed: {0}")]
    Invariant(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidPattern(e.to_string())
    }
}
