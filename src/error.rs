//! Error types for the fallible edges of the estimator (file loading, rule validation)
//!
//! The calculation core itself is total and never returns these.

use thiserror::Error;

/// Result alias used by loaders
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Errors raised while loading rules or individual data
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rule parameters violate an invariant
    #[error("Invalid rule parameters: {0}")]
    InvalidRules(String),

    /// Invalid data format
    #[error("Invalid data format in row {row}: {message}")]
    InvalidFormat { row: usize, message: String },
}
