//! Trial loop driving the agent through the traffic world

use std::{thread, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Error, Result,
    analysis::{RunSummary, TrialRecord},
    ports::{Observer, Planner},
    q_learning::LearningAgent,
    world::GridWorld,
};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Switch to testing once ε falls below this value
    pub tolerance: f64,

    /// Number of testing trials
    pub n_test: usize,

    /// Training trials completed before the tolerance is checked
    pub min_training_trials: usize,

    /// Training trials after which testing starts regardless of ε
    pub max_training_trials: usize,

    /// Real-time pause after every step, in milliseconds
    pub update_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            n_test: 10,
            min_training_trials: 20,
            max_training_trials: 1000,
            update_delay_ms: 0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(Error::config(format!(
                "tolerance must be within [0, 1], got {}",
                self.tolerance
            )));
        }
        if self.max_training_trials < self.min_training_trials {
            return Err(Error::config(format!(
                "max training trials ({}) is below the minimum ({})",
                self.max_training_trials, self.min_training_trials
            )));
        }
        Ok(())
    }
}

/// Result of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub summary: RunSummary,
    pub trials: Vec<TrialRecord>,
}

/// Runs training trials, then testing trials, for one agent
pub struct Simulator {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    /// Create a new simulator
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulator
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn notify<F>(&mut self, mut event: F) -> Result<()>
    where
        F: FnMut(&mut dyn Observer) -> Result<()>,
    {
        for observer in &mut self.observers {
            event(observer.as_mut())?;
        }
        Ok(())
    }

    /// Whether training is finished before the next trial.
    fn training_finished<P: Planner>(&self, completed: usize, agent: &LearningAgent<P>) -> bool {
        if completed < self.config.min_training_trials {
            return false;
        }
        if !agent.is_learning() {
            return true;
        }
        if agent.epsilon() < self.config.tolerance {
            info!(
                trials = completed,
                epsilon = agent.epsilon(),
                "exploration below tolerance, starting testing"
            );
            return true;
        }
        if completed >= self.config.max_training_trials {
            warn!(
                trials = completed,
                epsilon = agent.epsilon(),
                "training trial cap reached before exploration fell below tolerance"
            );
            return true;
        }
        false
    }

    /// Run the whole simulation.
    ///
    /// Each step advances the world clock, lets the agent act, and settles
    /// the deadline; a trial ends when the world reports it done.
    pub fn run<P: Planner>(
        &mut self,
        world: &mut GridWorld,
        agent: &mut LearningAgent<P>,
    ) -> Result<SimulationResult> {
        self.config.validate()?;
        self.notify(|o| o.on_run_start())?;

        let delay = Duration::from_millis(self.config.update_delay_ms);
        let mut records = Vec::new();
        let mut testing = false;
        let mut completed_training = 0;
        let mut trial = 1;

        loop {
            if testing {
                if trial > self.config.n_test {
                    break;
                }
            } else if self.training_finished(completed_training, agent) {
                testing = true;
                trial = 1;
                continue;
            }

            let start = world.reset()?;
            let params = agent.reset(start.destination, testing);
            self.notify(|o| o.on_trial_start(trial, &start))?;

            while !world.is_done() {
                world.begin_step();
                let step = agent.update(world)?;
                self.notify(|o| o.on_step(trial, &step))?;
                world.end_step()?;
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }

            let stats = world.trial_stats().ok_or(Error::NoActiveTrial)?;
            let record = TrialRecord::new(trial, testing, params, stats);
            info!(
                trial,
                testing,
                epsilon = params.epsilon,
                alpha = params.alpha,
                success = record.success,
                steps = record.steps,
                net_reward = record.net_reward,
                "trial finished"
            );
            self.notify(|o| o.on_trial_end(&record))?;
            records.push(record);

            if !testing {
                completed_training += 1;
            }
            trial += 1;
        }

        let summary = RunSummary::from_trials(&records, agent.q_table().len());
        info!(
            training_trials = summary.training_trials,
            testing_trials = summary.testing_trials,
            reliability = %summary.reliability,
            safety = %summary.safety,
            states = summary.states_learned,
            "simulation finished"
        );
        self.notify(|o| o.on_run_end(&summary))?;

        Ok(SimulationResult {
            summary,
            trials: records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_bounds_are_rejected() {
        let config = SimulationConfig {
            min_training_trials: 10,
            max_training_trials: 5,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            tolerance: 2.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
