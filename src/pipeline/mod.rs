//! Simulation pipeline
//!
//! This module provides:
//! - The trial loop that trains and then tests an agent
//! - Observers recording progress, trial logs and step traces

pub mod observers;
pub mod simulator;

// Re-export observer implementations (adapters)
pub use observers::{CsvTrialLogger, JsonlObserver, Observation, ProgressObserver};
pub use simulator::{SimulationConfig, SimulationResult, Simulator};

pub use crate::ports::Observer;
