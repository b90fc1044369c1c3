//! Run command - train the agent, then grade it on testing trials

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::{
    app::{App, RunConfig},
    cli::output::{print_kv, print_summary, resolve_output_path},
    pipeline::{CsvTrialLogger, JsonlObserver, ProgressObserver},
    ports::Observer,
};

#[derive(Parser, Debug)]
#[command(about = "Run a training and testing session", allow_negative_numbers = true)]
pub struct RunArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable Q-learning (otherwise the agent drives at random)
    #[arg(long, short = 'l')]
    pub learning: bool,

    /// Initial exploration rate
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Learning rate
    #[arg(long, short = 'a')]
    pub alpha: Option<f64>,

    /// Exploration rate below which training stops
    #[arg(long, short = 't')]
    pub tolerance: Option<f64>,

    /// Number of testing trials
    #[arg(long, short = 'n')]
    pub n_test: Option<usize>,

    /// Minimum number of training trials
    #[arg(long)]
    pub min_training: Option<usize>,

    /// Maximum number of training trials
    #[arg(long)]
    pub max_training: Option<usize>,

    /// Number of dummy vehicles
    #[arg(long)]
    pub dummies: Option<usize>,

    /// Grid size as COLUMNSxROWS, e.g. 8x6
    #[arg(long, value_parser = parse_grid)]
    pub grid: Option<(i32, i32)>,

    /// Do not end trials when the deadline runs out
    #[arg(long)]
    pub no_deadline: bool,

    /// Random seed for the agent and the world
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after every step, in milliseconds
    #[arg(long)]
    pub update_delay: Option<u64>,

    /// Write one CSV row per trial to this file
    #[arg(long)]
    pub log_metrics: Option<PathBuf>,

    /// Write every step as JSONL, one trial per line
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Write the learned Q-table report to this file
    #[arg(long)]
    pub q_table: Option<PathBuf>,

    /// Write the run summary as JSON (file or directory)
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress spinner
    #[arg(long)]
    pub progress: bool,
}

/// Parse `COLUMNSxROWS`.
pub fn parse_grid(value: &str) -> Result<(i32, i32), String> {
    let (columns, rows) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected COLUMNSxROWS, got '{value}'"))?;
    let columns = columns
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid column count '{columns}': {e}"))?;
    let rows = rows
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid row count '{rows}': {e}"))?;
    Ok((columns, rows))
}

impl RunArgs {
    /// Build the run configuration: file (or defaults), then flag overrides.
    pub fn to_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if self.learning {
            config.agent.learning = true;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            config.agent.alpha = alpha;
        }
        if let Some(tolerance) = self.tolerance {
            config.simulation.tolerance = tolerance;
        }
        if let Some(n_test) = self.n_test {
            config.simulation.n_test = n_test;
        }
        if let Some(min) = self.min_training {
            config.simulation.min_training_trials = min;
        }
        if let Some(max) = self.max_training {
            config.simulation.max_training_trials = max;
        }
        if let Some(delay) = self.update_delay {
            config.simulation.update_delay_ms = delay;
        }
        if let Some(dummies) = self.dummies {
            config.world.num_dummies = dummies;
        }
        if let Some((columns, rows)) = self.grid {
            config.world.grid_size = (columns, rows);
        }
        if self.no_deadline {
            config.world.enforce_deadline = false;
        }
        if let Some(seed) = self.seed {
            config.agent.seed = Some(seed);
            config.world.seed = Some(seed.wrapping_add(1));
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn observers(&self) -> anyhow::Result<Vec<Box<dyn Observer>>> {
        let mut observers: Vec<Box<dyn Observer>> = Vec::new();
        if self.progress {
            observers.push(Box::new(ProgressObserver::new()));
        }
        if let Some(path) = &self.log_metrics {
            let logger = CsvTrialLogger::new(path)
                .with_context(|| format!("Failed to open trial log {}", path.display()))?;
            observers.push(Box::new(logger));
        }
        if let Some(path) = &self.observations {
            let observer = JsonlObserver::new(path)
                .with_context(|| format!("Failed to open observation log {}", path.display()))?;
            observers.push(Box::new(observer));
        }
        Ok(observers)
    }
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    info!(
        learning = config.agent.learning,
        alpha = config.agent.alpha,
        tolerance = config.simulation.tolerance,
        dummies = config.world.num_dummies,
        "starting simulation"
    );

    let app = App::new(config)?;
    let (result, agent) = app.run_with_agent(args.observers()?)?;

    print_summary(&result.summary);

    if let Some(path) = &args.q_table {
        let file = File::create(path)
            .with_context(|| format!("Failed to create Q-table report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        agent.q_table().write_report(&mut writer)?;
        writer.flush()?;
        print_kv("Q-table report", &path.display().to_string());
    }

    if let Some(raw) = &args.summary {
        let path = resolve_output_path(raw, "summary.json", "json");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result.summary)?;
        print_kv("Summary", &path.display().to_string());
    }

    if let Some(path) = &args.log_metrics {
        print_kv("Trial log", &path.display().to_string());
    }
    if let Some(path) = &args.observations {
        print_kv("Observations", &path.display().to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid() {
        assert_eq!(parse_grid("8x6"), Ok((8, 6)));
        assert_eq!(parse_grid("10X4"), Ok((10, 4)));
        assert!(parse_grid("8").is_err());
        assert!(parse_grid("ax6").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs::parse_from([
            "run",
            "--learning",
            "--alpha",
            "0.2",
            "--tolerance",
            "0.1",
            "--grid",
            "6x4",
            "--dummies",
            "5",
            "--no-deadline",
            "--seed",
            "9",
        ]);
        let config = args.to_config().unwrap();
        assert!(config.agent.learning);
        assert_eq!(config.agent.alpha, 0.2);
        assert_eq!(config.simulation.tolerance, 0.1);
        assert_eq!(config.world.grid_size, (6, 4));
        assert_eq!(config.world.num_dummies, 5);
        assert!(!config.world.enforce_deadline);
        assert_eq!(config.agent.seed, Some(9));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = RunArgs::parse_from(["run", "--alpha", "-0.5"]);
        assert!(args.to_config().is_err());
    }
}
