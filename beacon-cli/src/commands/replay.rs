use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::ConfigLoader;
use crate::replay::{ReplayScript, Replayer};
use crate::session::Session;

#[derive(Args)]
pub struct ReplayArgs {
    /// Session script (JSON)
    pub script: PathBuf,
}

pub async fn run(args: ReplayArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let contents = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let script: ReplayScript = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid replay script {}", args.script.display()))?;

    let session = Session::start(&config.analytics);
    let summary = Replayer::new(session.emitter.clone(), &config.monitors)
        .run(&script, &session.hooks)?;

    session.print_calls()?;
    session.finish().await;

    info!(
        steps = summary.steps,
        elapsed = ?summary.elapsed,
        exited = summary.exited,
        "Replay finished"
    );
    for (experiment, variant) in &summary.assignments {
        info!(experiment = %experiment, variant = %variant, "Experiment assigned");
    }
    Ok(())
}
