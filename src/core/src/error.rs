//! Error types for the user directory data model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for invalid records and definitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid input/state
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Two entries claim the same unique key
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// No identifiers left to assign
    #[error("Identifier space exhausted")]
    IdsExhausted,
}

impl CoreError {
    /// Create an invalid error
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        CoreError::Invalid(msg.into())
    }

    /// Create a duplicate error
    pub fn duplicate<S: Into<String>>(msg: S) -> Self {
        CoreError::Duplicate(msg.into())
    }
}
