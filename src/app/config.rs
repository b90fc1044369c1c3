//! Configuration types for agent creation and whole runs.

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result, pipeline::SimulationConfig, world::WorldConfig};

/// Configuration for creating a learning agent.
///
/// # Examples
///
/// ```
/// use smartcab::app::AgentConfig;
///
/// let config = AgentConfig::new()
///     .with_learning(true)
///     .with_alpha(0.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Whether the agent builds and follows a Q-table
    pub learning: bool,
    /// Exploration rate before the first trial
    pub epsilon: f64,
    /// Learning rate, also the decay coefficient of the exploration curve
    pub alpha: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with defaults:
    /// - Learning: off (random driver)
    /// - Epsilon: 1.0
    /// - Alpha: 0.5
    /// - Seed: None (non-deterministic)
    pub fn new() -> Self {
        Self {
            learning: false,
            epsilon: 1.0,
            alpha: 0.5,
            seed: None,
        }
    }

    pub fn with_learning(mut self, learning: bool) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that both rates lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("epsilon", self.epsilon), ("alpha", self.alpha)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.learning && self.alpha == 0.0 {
            warn!("learning agent configured with alpha = 0; the table will never change");
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to run a simulation, loadable from JSON.
///
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub world: WorldConfig,
    pub simulation: SimulationConfig,
}

impl RunConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config: RunConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Share one seed between agent and world unless they set their own.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.agent.seed.get_or_insert(seed);
        self.world.seed.get_or_insert(seed.wrapping_add(1));
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.world.validate()?;
        self.simulation.validate()
    }
}
