//! Observer pattern for simulation runs
//!
//! Observers allow composable data collection during a run without coupling
//! the trial loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    analysis::{RunSummary, TrialRecord},
    ports::Observer,
    q_learning::StepRecord,
    world::TrialStart,
};

/// Complete observation of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Trial number
    pub trial: usize,
    /// Whether the trial was a testing trial
    pub testing: bool,
    /// Whether the destination was reached
    pub success: bool,
    /// Route layout
    pub start: Option<TrialStart>,
    /// Steps in the trial
    pub steps: Vec<StepRecord>,
}

/// Progress spinner observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    trials: usize,
    successes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            trials: 0,
            successes: 0,
        }
    }

    fn message(&self, testing: bool) -> String {
        let phase = if testing { "testing" } else { "training" };
        format!("{phase} | reached {}/{}", self.successes, self.trials)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self) -> Result<()> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} trials ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?,
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        self.trials += 1;
        if record.success {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message(record.testing));
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "reliability {} | safety {}",
                summary.reliability, summary.safety
            ));
        }
        Ok(())
    }
}

/// CSV observer - One row per finished trial
pub struct CsvTrialLogger {
    writer: csv::Writer<File>,
}

impl CsvTrialLogger {
    /// Create a CSV log, truncating any existing file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create trial log {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
        })
    }
}

impl Observer for CsvTrialLogger {
    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// JSONL observer - Records every step, one trial per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_start: Option<TrialStart>,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_start: None,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize, start: &TrialStart) -> Result<()> {
        self.current_start = Some(*start);
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, step: &StepRecord) -> Result<()> {
        self.current_steps.push(*step);
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        let observation = Observation {
            trial: record.trial,
            testing: record.testing,
            success: record.success,
            start: self.current_start.take(),
            steps: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader};

    use tempfile::TempDir;

    use super::*;
    use crate::{
        q_learning::{State, TrialParameters},
        types::{Action, Heading, Location},
        world::TrialStats,
    };

    fn record(trial: usize, success: bool) -> TrialRecord {
        let stats = TrialStats {
            initial_deadline: 25,
            final_deadline: 10,
            steps: 15,
            net_reward: 12.5,
            success,
            ..TrialStats::default()
        };
        TrialRecord::new(
            trial,
            false,
            TrialParameters {
                epsilon: 0.8776,
                alpha: 0.5,
            },
            &stats,
        )
    }

    #[test]
    fn test_csv_logger_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trials.csv");
        let mut logger = CsvTrialLogger::new(&path).unwrap();
        logger.on_trial_end(&record(1, true)).unwrap();
        logger.on_trial_end(&record(2, false)).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "trial");
        assert!(headers.iter().any(|h| h == "major_accidents"));

        let rows: Vec<TrialRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![record(1, true), record(2, false)]);
    }

    #[test]
    fn test_jsonl_observer_groups_steps_by_trial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("steps.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();

        let start = TrialStart {
            start: Location::new(1, 1),
            heading: Heading::EAST,
            destination: Location::new(5, 1),
            deadline: 20,
        };
        let step = StepRecord {
            state: State {
                waypoint: Some(Action::Forward),
                right: None,
                left: None,
                oncoming: None,
            },
            waypoint: Some(Action::Forward),
            action: Action::Forward,
            reward: 2.0,
            epsilon: 0.5,
            alpha: 0.5,
            new_state: true,
        };

        observer.on_trial_start(1, &start).unwrap();
        observer.on_step(1, &step).unwrap();
        observer.on_step(1, &step).unwrap();
        observer.on_trial_end(&record(1, true)).unwrap();

        let lines: Vec<String> = BufReader::new(File::open(&path).unwrap())
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 1);
        let parsed: Observation = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed.trial, 1);
        assert_eq!(parsed.steps.len(), 2);
        assert_eq!(parsed.start, Some(start));
    }
}
