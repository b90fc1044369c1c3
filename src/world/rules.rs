//! Right-of-way rules and the reward function

use serde::{Deserialize, Serialize};

use crate::types::{Action, Light, Percept};

/// How badly an action broke the traffic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    None,
    MinorViolation,
    MajorViolation,
    MinorAccident,
    MajorAccident,
}

impl Violation {
    /// Whether the vehicle is allowed to carry out the move.
    pub fn is_legal(self) -> bool {
        self == Violation::None
    }

    /// Fixed penalty applied instead of the driving reward.
    pub fn penalty(self) -> f64 {
        match self {
            Violation::None => 0.0,
            Violation::MinorViolation => -5.0,
            Violation::MajorViolation => -10.0,
            Violation::MinorAccident => -20.0,
            Violation::MajorAccident => -40.0,
        }
    }
}

/// Classify `action` given what the driver sees and where it wants to go.
pub fn judge(action: Action, percept: &Percept, waypoint: Option<Action>) -> Violation {
    let red = percept.light == Light::Red;
    let cross_traffic =
        percept.left == Some(Action::Forward) || percept.right == Some(Action::Forward);
    let oncoming_blocks_left = matches!(percept.oncoming, Some(Action::Forward | Action::Right));

    match action {
        Action::Forward | Action::Left if red => {
            if cross_traffic {
                Violation::MajorAccident
            } else {
                Violation::MajorViolation
            }
        }
        Action::Left if oncoming_blocks_left => Violation::MinorAccident,
        Action::Right if red && percept.left == Some(Action::Forward) => Violation::MinorAccident,
        Action::Idle if !red => {
            let must_yield = percept.oncoming == Some(Action::Left)
                || (waypoint == Some(Action::Left) && oncoming_blocks_left);
            match waypoint {
                Some(w) if w != Action::Idle && !must_yield => Violation::MinorViolation,
                _ => Violation::None,
            }
        }
        _ => Violation::None,
    }
}

/// Reward for one primary-agent move, before noise and arrival bonus.
///
/// `time_penalty` is the fraction of the deadline already used, in `[0, 1]`.
pub fn base_reward(
    action: Action,
    violation: Violation,
    percept: &Percept,
    waypoint: Option<Action>,
    time_penalty: f64,
) -> f64 {
    if !violation.is_legal() {
        return violation.penalty();
    }
    if Some(action) == waypoint || (action == Action::Idle && percept.light == Light::Red) {
        2.0 - time_penalty
    } else {
        1.0 - time_penalty
    }
}
