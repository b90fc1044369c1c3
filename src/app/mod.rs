//! Application layer: configuration and dependency wiring.
//!
//! [`RunConfig`] gathers the agent, world and simulation settings;
//! [`App`] turns a validated configuration into a world, an agent and a
//! simulator.
//!
//! ```text
//!  RunConfig ──▶ App ──▶ GridWorld (Environment adapter)
//!                   ├──▶ LearningAgent<RoutePlanner>
//!                   └──▶ Simulator + observers
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, RunConfig};
pub use container::App;
