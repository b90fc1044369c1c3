//! Ports (trait boundaries) for the agent's collaborators.
//!
//! The learning core only talks to the world, the route planner and the
//! run observers through these traits. Concrete implementations live in
//! [`crate::world`] and [`crate::pipeline`].

pub mod environment;
pub mod observer;
pub mod planner;

pub use environment::Environment;
pub use observer::Observer;
pub use planner::Planner;
