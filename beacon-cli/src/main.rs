use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod replay;
mod session;

#[derive(Parser)]
#[command(name = "beacon", about = "Landing-page instrumentation toolkit")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Assign a visitor to an experiment variant
    Assign(commands::assign::AssignArgs),
    /// Replay a recorded page session through the monitors
    Replay(commands::replay::ReplayArgs),
    /// Submit the contact form and capture a lead
    Lead(commands::lead::LeadArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config(args) => commands::config::run(args),
        Commands::Assign(args) => commands::assign::run(args).await,
        Commands::Replay(args) => commands::replay::run(args).await,
        Commands::Lead(args) => commands::lead::run(args).await,
    }
}
