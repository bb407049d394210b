//! Error types for lead capture

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, LeadError>;

/// Errors that can occur while capturing a lead.
#[derive(Debug, Error)]
pub enum LeadError {
    /// The request carried no email address.
    #[error("Email is required")]
    MissingEmail,

    /// The endpoint refused the lead.
    #[error("lead rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request could not be delivered.
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with something other than the lead contract.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
