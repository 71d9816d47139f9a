//! Error types for building and reading the NEO data model.

/// Result type for data model operations
pub type NeoResult<T> = Result<T, NeoError>;

/// Error type for data model operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeoError {
    #[error("Blank designation: every near-Earth object needs a primary designation")]
    BlankDesignation,

    #[error("Duplicate designation: {0}")]
    DuplicateDesignation(String),

    #[error("Close approach for '{0}' is not linked to a near-Earth object")]
    UnlinkedApproach(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
