//! In-memory lead store with the endpoint's uniqueness rule

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::capture::LeadCapture;
use crate::error::Result;
use crate::types::{DEFAULT_LEAD_STATUS, Lead, LeadOutcome, LeadRequest};

/// Keeps captured leads in memory; one lead per email.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured leads, oldest first.
    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

#[async_trait]
impl LeadCapture for MemoryLeadStore {
    async fn capture(&self, request: LeadRequest) -> Result<LeadOutcome> {
        request.validate()?;
        let request = request.normalized();
        let email = request.email;

        let mut leads = self.leads.write().await;
        if leads.iter().any(|l| l.email == email) {
            debug!(email = %email, "Lead already registered");
            return Ok(LeadOutcome::AlreadyRegistered);
        }

        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            email,
            name: request.name,
            message: request.message,
            status: DEFAULT_LEAD_STATUS.to_string(),
            created_at: Utc::now(),
        };
        leads.push(lead.clone());
        Ok(LeadOutcome::Created(Some(lead)))
    }
}
