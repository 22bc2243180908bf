//! Error types for the authorization crate
//!
//! Decisions never fail: denials are values of [`crate::engine::Decision`].
//! These errors only arise while loading role definitions and seed data.

use thiserror::Error;
use userdir_core::CoreError;

/// Authorization crate errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Seed data is structurally valid JSON but violates a load rule
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// A role definition or user record failed validation
    #[error(transparent)]
    Core(#[from] CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
