//! Error types for RapidSetup trigger evaluation

use thiserror::Error;

/// Error raised by a [`TriggerStore`](crate::TriggerStore) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The named object does not exist in the backing store
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The backing store failed while serving the request
    #[error("Backend failure: {0}")]
    Backend(String),
}

/// Main error type for trigger evaluation
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The constraint configuration is structurally invalid
    #[error("Invalid constraint configuration: {0}")]
    InvalidConfiguration(String),

    /// A collaborator lookup failed while evaluating
    #[error("Evaluation failed while resolving {what}: {source}")]
    Lookup {
        what: String,
        #[source]
        source: StoreError,
    },
}

impl EvaluationError {
    /// Creates a configuration error.
    pub fn invalid(message: impl Into<String>) -> Self {
        EvaluationError::InvalidConfiguration(message.into())
    }

    /// Wraps a store failure, naming the object being resolved.
    pub fn lookup(what: impl Into<String>, source: StoreError) -> Self {
        EvaluationError::Lookup {
            what: what.into(),
            source,
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, EvaluationError::InvalidConfiguration(_))
    }
}

/// Result type alias for trigger evaluation
pub type Result<T> = std::result::Result<T, EvaluationError>;
