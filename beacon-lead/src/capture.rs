use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LeadOutcome, LeadRequest};

/// Records leads with the lead-capture collaborator.
///
/// Implementations validate the request first: a blank email never leaves
/// the client.
#[async_trait]
pub trait LeadCapture: Send + Sync {
    async fn capture(&self, request: LeadRequest) -> Result<LeadOutcome>;
}
