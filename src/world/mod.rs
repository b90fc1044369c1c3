//! Grid-world traffic simulation the agent learns to drive in
//!
//! - [`GridWorld`]: intersections, lights, dummy traffic, deadlines and rewards
//! - [`RoutePlanner`]: greedy route guidance toward the trial destination
//! - [`rules`]: right-of-way judgement and the reward scheme

pub mod environment;
pub mod light;
pub mod planner;
pub mod rules;

pub use environment::{
    ActionCounts, GridWorld, StepStatus, TrialStart, TrialStats, WorldConfig,
};
pub use light::TrafficLight;
pub use planner::RoutePlanner;
pub use rules::Violation;
