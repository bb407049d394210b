use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use beacon_experiments::{Assigner, Experiment, FileStore, RandomSource, SeededRandom, ThreadRandom, Variant};
use clap::Args;

use crate::config::ConfigLoader;
use crate::session::Session;

#[derive(Args)]
pub struct AssignArgs {
    /// Experiment name
    pub experiment: String,

    /// Variant as name=weight, in order; the first is the fallback
    #[arg(long = "variant", value_parser = parse_variant, required = true)]
    pub variants: Vec<Variant>,

    /// Seed the draw for a reproducible assignment
    #[arg(long)]
    pub seed: Option<u64>,

    /// Assignment store file (defaults to the configured store)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Print the backend calls made
    #[arg(long)]
    pub calls: bool,
}

pub async fn run(args: AssignArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let store_path = args.store.unwrap_or(config.experiments.store_path);
    let store = Arc::new(FileStore::open(&store_path)?);
    let random: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    };
    let experiment = Experiment::new(args.experiment, args.variants)?;

    let session = Session::start(&config.analytics);
    let assigner = Assigner::new(store, session.emitter.clone()).with_random(random);
    let outcome = assigner.assign_with_outcome(&experiment);

    let origin = if outcome.fresh { "new" } else { "stored" };
    println!("{}\t{}\t{}", outcome.experiment, outcome.variant.name, origin);
    if args.calls {
        session.print_calls()?;
    }
    session.finish().await;
    Ok(())
}

fn parse_variant(s: &str) -> Result<Variant> {
    let Some((name, weight)) = s.split_once('=') else {
        bail!("expected name=weight, got '{s}'");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("variant name is empty in '{s}'");
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid weight in '{s}': {e}"))?;
    Ok(Variant::named(name, weight))
}
