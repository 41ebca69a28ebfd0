// Error taxonomy for the rewards service
// One tagged enum for every layer; the HTTP boundary maps it to a status code

use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for rewards operations
pub type Result<T> = std::result::Result<T, RewardsError>;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Coarse classification used to pick a transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed, missing or out-of-order input
    BadRequest,
    /// No matching record
    NotFound,
    /// Anything else
    Internal,
}

// ============================================================================
// REWARDS ERROR
// ============================================================================

#[derive(Error, Debug)]
pub enum RewardsError {
    /// Request parameters are missing or inconsistent
    #[error("{0}")]
    InvalidRequest(String),

    /// A submitted transaction breaks the amount/date invariants
    #[error("{0}")]
    InvalidTransaction(String),

    /// A date could not be parsed as YYYY-MM-DD
    #[error("{0}")]
    InvalidDateFormat(String),

    /// Field-level validation failures (field -> message)
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(BTreeMap<String, String>),

    /// No customer or no transactions matched the query
    #[error("{0}")]
    CustomerNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("{0}")]
    Unhandled(String),
}

fn format_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl RewardsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RewardsError::InvalidRequest(_)
            | RewardsError::InvalidTransaction(_)
            | RewardsError::InvalidDateFormat(_)
            | RewardsError::Validation(_) => ErrorKind::BadRequest,
            RewardsError::CustomerNotFound(_) => ErrorKind::NotFound,
            RewardsError::Storage(_) | RewardsError::Unhandled(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}
