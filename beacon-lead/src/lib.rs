//! beacon-lead: recording contact requests from the landing page
//!
//! [`LeadCapture`] is the single interface; [`HttpLeadClient`] talks to the
//! lead endpoint and [`MemoryLeadStore`] stands in for it in tests and
//! offline runs.

pub mod capture;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

pub use capture::LeadCapture;
pub use error::{LeadError, Result};
pub use http::{
    ALREADY_REGISTERED_MESSAGE, DEFAULT_LEAD_ENDPOINT, HttpLeadClient, interpret_response,
};
pub use memory::MemoryLeadStore;
pub use types::{DEFAULT_LEAD_STATUS, Lead, LeadOutcome, LeadRequest};
