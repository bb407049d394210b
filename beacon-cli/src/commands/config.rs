use anyhow::Result;
use beacon_core::AnalyticsConfig;
use clap::{Args, Subcommand};

use crate::config::{ConfigLoader, IdOrigin, Layer};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration and where each backend id came from
    Show,
    /// Show the config layer files and the assignment store
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config() -> Result<()> {
    let (config, origins) = ConfigLoader::load_traced(&Layer::files())?;
    print!("{}", describe_analytics(&config.analytics, &origins));
    println!();
    // The Measurement Protocol secret is never serialized.
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn show_paths() -> Result<()> {
    let files = Layer::files();
    for (layer, path) in &files {
        let state = if path.exists() { "found" } else { "missing" };
        println!("{:<8} {} ({state})", layer, path.display());
    }
    let config = ConfigLoader::load_from(&files)?;
    println!("{:<8} {}", "store", config.experiments.store_path.display());
    Ok(())
}

/// TOML comment block naming each backend id, its layer and forwarding state.
fn describe_analytics(analytics: &AnalyticsConfig, origins: &[IdOrigin]) -> String {
    let mut out = String::from("# backend ids\n");
    for origin in origins {
        let value = analytics.backend_id(origin.key).unwrap_or_default();
        let note = if analytics.is_placeholder(origin.key) {
            ", placeholder"
        } else {
            ""
        };
        out.push_str(&format!(
            "# {:<12} {value} ({}{note})\n",
            origin.key, origin.layer
        ));
    }
    match &analytics.measurement_protocol {
        Some(mp) => out.push_str(&format!(
            "# measurement protocol: forwarding to {} (api secret hidden)\n",
            mp.endpoint
        )),
        None => out.push_str("# measurement protocol: off\n"),
    }
    out
}
