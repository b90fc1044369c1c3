//! Config command - write a default configuration file

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::app::RunConfig;

#[derive(Parser, Debug)]
#[command(about = "Print or write the default run configuration")]
pub struct ConfigArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Enable learning in the written configuration
    #[arg(long, short = 'l')]
    pub learning: bool,
}

pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let mut config = RunConfig::default();
    config.agent.learning = args.learning;

    match args.output {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to write config {}", path.display()))?;
            println!("Wrote configuration to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
