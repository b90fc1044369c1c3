//! Smartcab: a Q-learning driving agent in a grid traffic world
//!
//! This crate provides:
//! - A tabular Q-learning agent with ε-greedy exploration and a cosine
//!   exploration schedule
//! - A wrapping grid world with traffic lights, dummy vehicles and
//!   right-of-way rules
//! - A simulator that trains until exploration decays, then grades the
//!   agent on frozen testing trials
//! - Observers for progress display, CSV trial logs and JSONL step traces

pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;
pub mod world;

pub use analysis::{Rating, RunSummary, TrialRecord};
pub use app::{AgentConfig, App, RunConfig};
pub use error::{Error, Result};
pub use q_learning::{LearningAgent, QTable, State, StepRecord};
pub use types::{Action, Heading, Light, Location, Percept, Pose};
pub use world::{GridWorld, RoutePlanner, WorldConfig};
