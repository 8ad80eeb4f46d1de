//! Error types for the performance harness

use std::time::Duration;

use thiserror::Error;

/// Boxed error produced by a measured operation
pub type OperationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a harness run and by the reporting layer
#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported result type `{type_name}` on iteration {iteration}: only integers and floats are supported")]
    UnsupportedResultType {
        iteration: usize,
        type_name: &'static str,
    },

    #[error("Operation failed on iteration {iteration}: {source}")]
    OperationFailure {
        iteration: usize,
        #[source]
        source: OperationError,
    },

    #[error("Iteration {iteration} exceeded the time limit of {limit:?}")]
    Timeout { iteration: usize, limit: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PerformanceError {
    /// Iteration index the error happened on, if it came from the timed loop
    pub fn iteration(&self) -> Option<usize> {
        match self {
            Self::UnsupportedResultType { iteration, .. }
            | Self::OperationFailure { iteration, .. }
            | Self::Timeout { iteration, .. } => Some(*iteration),
            _ => None,
        }
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, PerformanceError>;
