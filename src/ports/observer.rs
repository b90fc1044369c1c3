//! Observer port - abstraction for run observation and data collection
//!
//! This port defines the interface for observing simulation events,
//! allowing composable data collection without coupling the trial loop
//! to specific output formats or metrics.

use crate::{
    Result,
    analysis::{RunSummary, TrialRecord},
    q_learning::StepRecord,
    world::TrialStart,
};

/// Observer trait for monitoring a simulation run
///
/// Observers can be composed to collect different types of data:
/// - Progress spinners for user feedback
/// - CSV trial logs for analysis
/// - JSONL step traces for replaying trials
///
/// # Event Sequence
///
/// 1. `on_run_start()` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial, start)`
///    - `on_step(trial, step)` - For each simulated time step
///    - `on_trial_end(record)`
/// 3. `on_run_end(summary)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use smartcab::{analysis::TrialRecord, ports::Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_trial_end(&mut self, record: &TrialRecord) -> smartcab::Result<()> {
///         if record.success {
///             self.successes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first trial.
    fn on_run_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after the world and agent have been reset for a trial.
    ///
    /// `trial` is 1-based and restarts at 1 when testing begins.
    fn on_trial_start(&mut self, _trial: usize, _start: &TrialStart) -> Result<()> {
        Ok(())
    }

    /// Called after every agent step.
    fn on_step(&mut self, _trial: usize, _step: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when a trial terminates.
    fn on_trial_end(&mut self, _record: &TrialRecord) -> Result<()> {
        Ok(())
    }

    /// Called once after the last trial.
    ///
    /// Use this to flush files or display summaries.
    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}
