//! Environment port - what the agent needs from the traffic world

use crate::{
    Result,
    types::{Action, Percept, Pose},
};

/// Environment trait - the world as seen by the primary agent
///
/// The agent is passed the environment explicitly on every step, so the
/// world keeps exclusive ownership of its vehicles and lights.
///
/// # Examples
///
/// ```
/// use smartcab::{
///     ports::Environment,
///     types::{Action, Heading, Light, Location, Percept, Pose},
/// };
///
/// struct OpenRoad;
///
/// impl Environment for OpenRoad {
///     fn valid_actions(&self) -> &[Action] {
///         &Action::ALL
///     }
///
///     fn sense(&self) -> Percept {
///         Percept::empty(Light::Green)
///     }
///
///     fn deadline(&self) -> Option<i32> {
///         None
///     }
///
///     fn pose(&self) -> Option<Pose> {
///         Some(Pose { location: Location::new(1, 1), heading: Heading::EAST })
///     }
///
///     fn act(&mut self, action: Action, _intended: Option<Action>) -> smartcab::Result<f64> {
///         Ok(if action == Action::Forward { 2.0 } else { 0.0 })
///     }
/// }
/// ```
pub trait Environment {
    /// The fixed set of actions the agent may choose from.
    fn valid_actions(&self) -> &[Action];

    /// Current observation at the agent's intersection.
    fn sense(&self) -> Percept;

    /// Steps remaining in the trial, if a trial is running.
    fn deadline(&self) -> Option<i32>;

    /// Location and heading of the agent, if a trial is running.
    fn pose(&self) -> Option<Pose>;

    /// Execute `action` and return the reward.
    ///
    /// `intended` is the planner's suggestion for this step; the world uses
    /// it to tell a correct move from a merely legal one.
    ///
    /// # Errors
    ///
    /// Returns an error if no trial is in progress.
    fn act(&mut self, action: Action, intended: Option<Action>) -> Result<f64>;
}
