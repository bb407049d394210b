//! Lead records and capture outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LeadError, Result};

/// Status given to newly captured leads.
pub const DEFAULT_LEAD_STATUS: &str = "new";

/// A contact request to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LeadRequest {
    /// A request for `email`, trimmed.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            message: None,
        }
        .normalized()
    }

    /// Set the name; blank names are dropped.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    /// Set the message; blank messages are dropped.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = non_blank(message.into());
        self
    }

    /// The request as every capture records it: surrounding whitespace is
    /// stripped from the email.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let trimmed = self.email.trim();
        if trimmed.len() != self.email.len() {
            self.email = trimmed.to_string();
        }
        self
    }

    /// Reject requests without an email before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(LeadError::MissingEmail);
        }
        Ok(())
    }
}

fn non_blank(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

/// A captured lead as stored by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Successful outcome of a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    /// Newly recorded; the stored record when the endpoint returned one.
    Created(Option<Lead>),
    /// The email was already on file. Treated as success by callers.
    AlreadyRegistered,
}

impl LeadOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
