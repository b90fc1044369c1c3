//! Route planner adapter

use crate::{
    ports::Planner,
    types::{Action, Location, Pose},
};

/// Greedy planner: close the east-west gap first, then north-south.
///
/// Ignores grid wrap-around and other traffic.
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    destination: Option<Location>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Turn needed to close `delta` along one axis.
///
/// `along` is the heading component on that axis and `left` the component a
/// left turn would give.
fn steer(delta: i32, along: i32, left: i32) -> Action {
    if delta * along > 0 {
        Action::Forward
    } else if delta * along < 0 {
        // Heading away: loop around through right turns.
        Action::Right
    } else if delta * left > 0 {
        Action::Left
    } else {
        Action::Right
    }
}

impl Planner for RoutePlanner {
    fn route_to(&mut self, destination: Location) {
        self.destination = Some(destination);
    }

    fn destination(&self) -> Option<Location> {
        self.destination
    }

    fn next_waypoint(&self, pose: Pose) -> Option<Action> {
        let destination = self.destination?;
        let dx = destination.x - pose.location.x;
        let dy = destination.y - pose.location.y;
        let heading = pose.heading;
        let left = heading.turn_left();

        if dx != 0 {
            Some(steer(dx, heading.dx, left.dx))
        } else if dy != 0 {
            Some(steer(dy, heading.dy, left.dy))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Heading;

    fn pose(x: i32, y: i32, heading: Heading) -> Pose {
        Pose {
            location: Location::new(x, y),
            heading,
        }
    }

    fn planner_to(x: i32, y: i32) -> RoutePlanner {
        let mut planner = RoutePlanner::new();
        planner.route_to(Location::new(x, y));
        planner
    }

    #[test]
    fn test_no_destination_means_no_waypoint() {
        let planner = RoutePlanner::new();
        assert_eq!(planner.next_waypoint(pose(1, 1, Heading::EAST)), None);
    }

    #[test]
    fn test_arrived() {
        let planner = planner_to(3, 3);
        assert_eq!(planner.next_waypoint(pose(3, 3, Heading::NORTH)), None);
    }

    #[test]
    fn test_forward_when_aligned() {
        let planner = planner_to(5, 2);
        assert_eq!(
            planner.next_waypoint(pose(1, 2, Heading::EAST)),
            Some(Action::Forward)
        );
        let planner = planner_to(2, 6);
        assert_eq!(
            planner.next_waypoint(pose(2, 1, Heading::SOUTH)),
            Some(Action::Forward)
        );
    }

    #[test]
    fn test_turns_toward_destination() {
        // Heading north, destination to the east: turn right.
        let planner = planner_to(5, 2);
        assert_eq!(
            planner.next_waypoint(pose(1, 2, Heading::NORTH)),
            Some(Action::Right)
        );
        // Heading south, destination to the east: turn left.
        assert_eq!(
            planner.next_waypoint(pose(1, 2, Heading::SOUTH)),
            Some(Action::Left)
        );
        // Same column, heading east, destination north: turn left.
        let planner = planner_to(3, 1);
        assert_eq!(
            planner.next_waypoint(pose(3, 5, Heading::EAST)),
            Some(Action::Left)
        );
    }

    #[test]
    fn test_heading_away_turns_right() {
        let planner = planner_to(1, 1);
        assert_eq!(
            planner.next_waypoint(pose(4, 1, Heading::EAST)),
            Some(Action::Right)
        );
    }
}
