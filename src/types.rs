//! Shared domain types: actions, lights, grid coordinates and percepts.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the four moves a vehicle can make at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// Every action, in table order.
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// The three moves that actually leave an intersection.
    pub const MOVES: [Action; 3] = [Action::Forward, Action::Left, Action::Right];

    /// Slot of this action in a fixed-width value row.
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Forward => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" | "none" => Ok(Action::Idle),
            "forward" => Ok(Action::Forward),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(Error::UnknownSymbol {
                kind: "action".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Traffic light colour as seen by a particular vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Light {
    Red,
    Green,
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Light::Red => f.write_str("red"),
            Light::Green => f.write_str("green"),
        }
    }
}

impl FromStr for Light {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Light::Red),
            "green" => Ok(Light::Green),
            other => Err(Error::UnknownSymbol {
                kind: "light".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Intersection coordinates (1-based, x grows east, y grows south).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring grid wrap-around.
    pub fn distance(&self, other: &Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const EAST: Heading = Heading { dx: 1, dy: 0 };
    pub const SOUTH: Heading = Heading { dx: 0, dy: 1 };
    pub const WEST: Heading = Heading { dx: -1, dy: 0 };
    pub const NORTH: Heading = Heading { dx: 0, dy: -1 };

    pub const ALL: [Heading; 4] = [Heading::EAST, Heading::SOUTH, Heading::WEST, Heading::NORTH];

    pub fn turn_left(self) -> Heading {
        Heading {
            dx: self.dy,
            dy: -self.dx,
        }
    }

    pub fn turn_right(self) -> Heading {
        Heading {
            dx: -self.dy,
            dy: self.dx,
        }
    }

    pub fn reverse(self) -> Heading {
        Heading {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    /// Whether this heading travels along the north-south axis.
    pub fn is_vertical(self) -> bool {
        self.dy != 0
    }
}

/// Where a vehicle is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub heading: Heading,
}

/// What a vehicle observes at its current intersection.
///
/// Traffic fields hold the intended move of the vehicle approaching from
/// that side, or `None` when the side is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    pub light: Light,
    pub left: Option<Action>,
    pub right: Option<Action>,
    pub oncoming: Option<Action>,
}

impl Percept {
    /// A percept with no surrounding traffic.
    pub fn empty(light: Light) -> Self {
        Self {
            light,
            left: None,
            right: None,
            oncoming: None,
        }
    }

    /// Build a percept from loosely typed key/value pairs.
    ///
    /// Every key (`light`, `left`, `right`, `oncoming`) must be present; a
    /// `None` traffic value means no vehicle on that side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPercept`] for a missing key and
    /// [`Error::UnknownSymbol`] for a value that does not parse.
    pub fn from_fields(fields: &HashMap<String, Option<String>>) -> Result<Self> {
        let field = |name: &str| {
            fields.get(name).ok_or_else(|| Error::MalformedPercept {
                field: name.to_string(),
            })
        };
        let traffic = |name: &str| -> Result<Option<Action>> {
            field(name)?.as_deref().map(str::parse::<Action>).transpose()
        };

        let light = field("light")?
            .as_deref()
            .ok_or_else(|| Error::MalformedPercept {
                field: "light".to_string(),
            })?
            .parse()?;

        Ok(Self {
            light,
            left: traffic("left")?,
            right: traffic("right")?,
            oncoming: traffic("oncoming")?,
        })
    }
}
