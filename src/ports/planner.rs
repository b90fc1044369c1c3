//! Planner port - route guidance toward the trial destination

use crate::types::{Action, Location, Pose};

/// Suggests the next move toward a destination.
pub trait Planner {
    /// Set the destination for the coming trial.
    fn route_to(&mut self, destination: Location);

    /// Destination currently being routed to.
    fn destination(&self) -> Option<Location>;

    /// Suggested move from `pose`, or `None` once the destination is reached.
    fn next_waypoint(&self, pose: Pose) -> Option<Action>;
}
