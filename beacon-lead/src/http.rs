//! HTTP client for the lead-capture endpoint
//!
//! The endpoint accepts `POST {email, name?, message?}` and answers:
//!
//! | Status | Body | Outcome |
//! |--------|------|---------|
//! | 200 | `{success: true, data}` | [`LeadOutcome::Created`] |
//! | 200 | `{message: "Email already registered"}` | [`LeadOutcome::AlreadyRegistered`] |
//! | 400/500 | `{error}` | [`LeadError::Rejected`] |

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::capture::LeadCapture;
use crate::error::{LeadError, Result};
use crate::types::{Lead, LeadOutcome, LeadRequest};

/// Message the endpoint uses for a uniqueness conflict.
pub const ALREADY_REGISTERED_MESSAGE: &str = "Email already registered";

/// Default endpoint path on the landing page's own origin.
pub const DEFAULT_LEAD_ENDPOINT: &str = "http://localhost:3000/api/lead";

#[derive(Debug, Default, Deserialize)]
struct LeadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Map an endpoint response to an outcome.
pub fn interpret_response(status: u16, body: &str) -> Result<LeadOutcome> {
    let parsed = serde_json::from_str::<LeadResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.error.or(r.message))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(LeadError::Rejected { status, message });
    }

    let response = parsed.map_err(|e| LeadError::InvalidResponse(e.to_string()))?;
    if response.success {
        let lead = match response.data {
            None | Some(Value::Null) => None,
            Some(data) => match serde_json::from_value::<Lead>(data) {
                Ok(lead) => Some(lead),
                Err(e) => {
                    debug!(error = %e, "Lead record not parsed");
                    None
                }
            },
        };
        return Ok(LeadOutcome::Created(lead));
    }
    if response.message.as_deref() == Some(ALREADY_REGISTERED_MESSAGE) {
        return Ok(LeadOutcome::AlreadyRegistered);
    }
    if let Some(error) = response.error {
        return Err(LeadError::Rejected {
            status,
            message: error,
        });
    }

    Err(LeadError::InvalidResponse(body.trim().to_string()))
}

/// Lead capture over HTTP.
pub struct HttpLeadClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpLeadClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadCapture for HttpLeadClient {
    async fn capture(&self, request: LeadRequest) -> Result<LeadOutcome> {
        request.validate()?;
        let request = request.normalized();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LeadError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LeadError::Request(e.to_string()))?;

        let outcome = interpret_response(status, &body);
        match &outcome {
            Ok(o) => debug!(endpoint = %self.endpoint, outcome = ?o, "Lead captured"),
            Err(e) => warn!(endpoint = %self.endpoint, error = %e, "Lead capture failed"),
        }
        outcome
    }
}
