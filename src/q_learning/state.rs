//! State abstraction: percept and suggested heading to a table key

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Action, Percept};

/// Marker used for an absent component in the rendered label.
const NULL_MARKER: &str = "-";

/// Discrete snapshot of what the agent perceives.
///
/// Components are `(waypoint, right, left, oncoming)`. `None` is the null
/// marker: no pending waypoint, or no vehicle on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub waypoint: Option<Action>,
    pub right: Option<Action>,
    pub left: Option<Action>,
    pub oncoming: Option<Action>,
}

impl State {
    /// Encode a percept together with the planner's suggestion.
    ///
    /// Pure function of its inputs; the light colour is not part of the key.
    pub fn encode(percept: &Percept, waypoint: Option<Action>) -> Self {
        Self {
            waypoint,
            right: percept.right,
            left: percept.left,
            oncoming: percept.oncoming,
        }
    }

    /// Components in key order.
    pub fn components(&self) -> [Option<Action>; 4] {
        [self.waypoint, self.right, self.left, self.oncoming]
    }

    /// Normalized string form, e.g. `forward|-|left|-`.
    pub fn label(&self) -> String {
        self.components()
            .iter()
            .map(|c| c.map_or(NULL_MARKER, Action::as_str))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Light;

    #[test]
    fn test_encode_is_deterministic() {
        let percept = Percept {
            light: Light::Red,
            left: Some(Action::Forward),
            right: None,
            oncoming: Some(Action::Left),
        };
        let a = State::encode(&percept, Some(Action::Right));
        let b = State::encode(&percept, Some(Action::Right));
        assert_eq!(a, b);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn test_light_is_not_part_of_state() {
        let red = Percept::empty(Light::Red);
        let green = Percept::empty(Light::Green);
        assert_eq!(
            State::encode(&red, Some(Action::Forward)),
            State::encode(&green, Some(Action::Forward))
        );
    }

    #[test]
    fn test_label_uses_null_marker() {
        let percept = Percept {
            light: Light::Green,
            left: Some(Action::Left),
            right: None,
            oncoming: None,
        };
        assert_eq!(State::encode(&percept, Some(Action::Forward)).label(), "forward|-|left|-");
        assert_eq!(State::encode(&percept, None).label(), "-|-|left|-");
    }

    #[test]
    fn test_idle_traffic_differs_from_absent_traffic() {
        let mut percept = Percept::empty(Light::Red);
        let absent = State::encode(&percept, None);
        percept.oncoming = Some(Action::Idle);
        let idle = State::encode(&percept, None);
        assert_ne!(absent, idle);
        assert_eq!(idle.label(), "-|-|-|idle");
    }
}
