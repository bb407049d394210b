use anyhow::Result;
use beacon_core::ConversionGoal;
use beacon_engage::{FormSubmission, TrackedForm};
use beacon_lead::{HttpLeadClient, LeadCapture, LeadOutcome, LeadRequest};
use clap::Args;

use crate::config::ConfigLoader;
use crate::session::Session;

#[derive(Args)]
pub struct LeadArgs {
    /// Contact email (required)
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Lead endpoint (defaults to the configured one)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Print the backend calls made
    #[arg(long)]
    pub calls: bool,
}

pub async fn run(args: LeadArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let endpoint = args.endpoint.unwrap_or(config.lead.endpoint);

    let mut request = LeadRequest::new(args.email);
    let mut submission = FormSubmission::new().with_field("email", request.email.clone());
    if let Some(name) = args.name {
        submission = submission.with_field("name", name.clone());
        request = request.with_name(name);
    }
    if let Some(message) = args.message {
        submission = submission.with_field("message", message.clone());
        request = request.with_message(message);
    }

    // A form without an email never submits.
    request.validate()?;

    let session = Session::start(&config.analytics);
    let form = TrackedForm::new(session.emitter.clone(), "contact")
        .with_conversion(ConversionGoal::ContactForm);
    let client = HttpLeadClient::new(endpoint);

    // Tracking happens before the request and does not depend on its result.
    let outcome = form
        .submit_with(&submission, |_| client.capture(request))
        .await;

    if args.calls {
        session.print_calls()?;
    }
    session.finish().await;

    match outcome? {
        LeadOutcome::Created(Some(lead)) => println!("Lead created: {} ({})", lead.email, lead.id),
        LeadOutcome::Created(None) => println!("Lead created"),
        LeadOutcome::AlreadyRegistered => println!("Email already registered"),
    }
    Ok(())
}
