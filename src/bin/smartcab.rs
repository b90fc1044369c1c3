//! smartcab CLI - Train and grade a Q-learning taxi in a traffic grid
//!
//! Subcommands:
//! - `run`: train the agent, then grade it on testing trials
//! - `config`: print or write the default configuration

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning driving agent in a grid traffic world", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent, then grade it on testing trials
    Run(Box<smartcab::cli::commands::run::RunArgs>),

    /// Print or write the default run configuration
    Config(smartcab::cli::commands::config::ConfigArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("smartcab={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => smartcab::cli::commands::run::execute(*args),
        Commands::Config(args) => smartcab::cli::commands::config::execute(args),
    }
}
