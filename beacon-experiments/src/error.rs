//! Error types for experiments and assignment storage

use thiserror::Error;

/// Errors building an experiment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("Experiment '{0}' has no variants")]
    NoVariants(String),

    #[error("Experiment '{experiment}' has duplicate variant '{variant}'")]
    DuplicateVariant { experiment: String, variant: String },

    #[error("Experiment '{experiment}' variant '{variant}' has invalid weight {weight}")]
    InvalidWeight {
        experiment: String,
        variant: String,
        weight: f64,
    },
}

/// Errors reading or writing stored assignments
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
