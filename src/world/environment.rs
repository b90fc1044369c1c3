//! Grid-world traffic environment

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, Heading, Light, Location, Percept, Pose},
    world::{
        light::TrafficLight,
        rules::{Violation, base_reward, judge},
    },
};

/// Minimum Manhattan distance between a trial's start and destination.
const MIN_ROUTE_DISTANCE: i32 = 4;

/// Steps granted per unit of route distance.
const DEADLINE_PER_DISTANCE: i32 = 5;

/// Bonus for arriving before the deadline runs out.
const ARRIVAL_BONUS: f64 = 10.0;

/// Configuration for the traffic world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of intersections as (columns, rows)
    pub grid_size: (i32, i32),
    /// Other vehicles driving around at random
    pub num_dummies: usize,
    /// End the trial once the deadline reaches zero
    pub enforce_deadline: bool,
    /// Deadline at which a trial always ends, enforced or not
    pub hard_time_limit: i32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: (8, 6),
            num_dummies: 100,
            enforce_deadline: true,
            hard_time_limit: -100,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn with_grid_size(mut self, columns: i32, rows: i32) -> Self {
        self.grid_size = (columns, rows);
        self
    }

    pub fn with_dummies(mut self, num_dummies: usize) -> Self {
        self.num_dummies = num_dummies;
        self
    }

    pub fn with_enforce_deadline(mut self, enforce: bool) -> Self {
        self.enforce_deadline = enforce;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that a trial can be laid out on the grid.
    pub fn validate(&self) -> Result<()> {
        let (columns, rows) = self.grid_size;
        if columns < 1 || rows < 1 {
            return Err(Error::config(format!(
                "grid size must be positive, got {columns}x{rows}"
            )));
        }
        if columns + rows - 2 < MIN_ROUTE_DISTANCE {
            return Err(Error::config(format!(
                "grid {columns}x{rows} is too small for routes of length {MIN_ROUTE_DISTANCE}"
            )));
        }
        if self.hard_time_limit > 0 {
            return Err(Error::config(format!(
                "hard time limit must not be positive, got {}",
                self.hard_time_limit
            )));
        }
        Ok(())
    }
}

/// Layout of a freshly reset trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialStart {
    pub start: Location,
    pub heading: Heading,
    pub destination: Location,
    pub deadline: i32,
}

/// Tally of primary-agent actions by rule outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub good: u32,
    pub minor_violations: u32,
    pub major_violations: u32,
    pub minor_accidents: u32,
    pub major_accidents: u32,
}

impl ActionCounts {
    pub fn record(&mut self, violation: Violation) {
        match violation {
            Violation::None => self.good += 1,
            Violation::MinorViolation => self.minor_violations += 1,
            Violation::MajorViolation => self.major_violations += 1,
            Violation::MinorAccident => self.minor_accidents += 1,
            Violation::MajorAccident => self.major_accidents += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.good + self.bad()
    }

    pub fn bad(&self) -> u32 {
        self.minor_violations + self.major_violations + self.minor_accidents + self.major_accidents
    }

    pub fn merge(&mut self, other: &ActionCounts) {
        self.good += other.good;
        self.minor_violations += other.minor_violations;
        self.major_violations += other.major_violations;
        self.minor_accidents += other.minor_accidents;
        self.major_accidents += other.major_accidents;
    }
}

/// Running bookkeeping for the current trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialStats {
    pub initial_deadline: i32,
    pub final_deadline: i32,
    pub steps: u32,
    pub net_reward: f64,
    pub actions: ActionCounts,
    pub success: bool,
}

/// Result of advancing the clock after an agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Running,
    Arrived,
    DeadlineExpired,
    TimeLimitReached,
}

impl StepStatus {
    pub fn is_done(self) -> bool {
        self != StepStatus::Running
    }
}

#[derive(Debug, Clone, Copy)]
struct Vehicle {
    pose: Pose,
    intent: Option<Action>,
}

#[derive(Debug, Clone)]
struct Trial {
    destination: Location,
    deadline: i32,
    stats: TrialStats,
    done: bool,
}

/// Grid of signalled intersections with wrap-around edges.
///
/// Hosts one primary agent, driven from outside through [`Environment`],
/// plus dummy vehicles that drive at random but obey the rules.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: WorldConfig,
    lights: HashMap<Location, TrafficLight>,
    dummies: Vec<Vehicle>,
    primary: Option<Vehicle>,
    trial: Option<Trial>,
    t: u64,
    rng: StdRng,
}

impl GridWorld {
    /// Build the grid, its lights and its dummy vehicles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the grid cannot host a trial.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let (columns, rows) = config.grid_size;
        let mut lights = HashMap::new();
        for x in 1..=columns {
            for y in 1..=rows {
                lights.insert(Location::new(x, y), TrafficLight::random(&mut rng));
            }
        }

        let mut world = Self {
            config,
            lights,
            dummies: Vec::new(),
            primary: None,
            trial: None,
            t: 0,
            rng,
        };
        for _ in 0..world.config.num_dummies {
            let dummy = world.random_dummy();
            world.dummies.push(dummy);
        }
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Simulated time since construction.
    pub fn time(&self) -> u64 {
        self.t
    }

    fn random_location(&mut self) -> Location {
        let (columns, rows) = self.config.grid_size;
        Location::new(
            self.rng.random_range(1..=columns),
            self.rng.random_range(1..=rows),
        )
    }

    fn random_heading(&mut self) -> Heading {
        Heading::ALL[self.rng.random_range(0..Heading::ALL.len())]
    }

    fn random_move(&mut self) -> Action {
        Action::MOVES[self.rng.random_range(0..Action::MOVES.len())]
    }

    fn random_dummy(&mut self) -> Vehicle {
        Vehicle {
            pose: Pose {
                location: self.random_location(),
                heading: self.random_heading(),
            },
            intent: Some(self.random_move()),
        }
    }

    /// Start a new trial with a random route.
    ///
    /// Dummy vehicles are scattered afresh.
    pub fn reset(&mut self) -> Result<TrialStart> {
        let (start, destination) = loop {
            let start = self.random_location();
            let destination = self.random_location();
            if start.distance(&destination) >= MIN_ROUTE_DISTANCE {
                break (start, destination);
            }
        };
        let heading = self.random_heading();
        let deadline = start.distance(&destination) * DEADLINE_PER_DISTANCE;

        for i in 0..self.dummies.len() {
            self.dummies[i] = self.random_dummy();
        }

        let trial_start = TrialStart {
            start,
            heading,
            destination,
            deadline,
        };
        self.place_primary(trial_start);
        debug!(%start, %destination, deadline, "trial reset");
        Ok(trial_start)
    }

    /// Place the primary agent for a trial with a chosen layout.
    pub fn place_primary(&mut self, layout: TrialStart) {
        self.primary = Some(Vehicle {
            pose: Pose {
                location: layout.start,
                heading: layout.heading,
            },
            intent: None,
        });
        self.trial = Some(Trial {
            destination: layout.destination,
            deadline: layout.deadline,
            stats: TrialStats {
                initial_deadline: layout.deadline,
                final_deadline: layout.deadline,
                ..TrialStats::default()
            },
            done: false,
        });
    }

    /// Add a dummy vehicle at a fixed pose with a fixed first move.
    pub fn add_dummy(&mut self, pose: Pose, intent: Action) {
        self.dummies.push(Vehicle {
            pose,
            intent: Some(intent),
        });
    }

    /// Remove every dummy vehicle.
    pub fn clear_dummies(&mut self) {
        self.dummies.clear();
    }

    pub fn num_dummies(&self) -> usize {
        self.dummies.len()
    }

    /// Force the phase of the light at `location`.
    pub fn set_light(&mut self, location: Location, north_south_open: bool, period: u64) {
        self.lights.insert(
            location,
            TrafficLight::new(north_south_open, period).switched_at(self.t),
        );
    }

    pub fn light_at(&self, location: Location, heading: Heading) -> Light {
        self.lights
            .get(&location)
            .map_or(Light::Red, |light| light.light_for(heading))
    }

    fn percept<'a>(&self, me: Pose, others: impl Iterator<Item = &'a Vehicle>) -> Percept {
        let mut percept = Percept::empty(self.light_at(me.location, me.heading));
        for other in others {
            if other.pose.location != me.location || other.pose.heading == me.heading {
                continue;
            }
            if other.pose.heading == me.heading.reverse() {
                if percept.oncoming != Some(Action::Left) {
                    percept.oncoming = other.intent;
                }
            } else if other.pose.heading == me.heading.turn_left() {
                // Travelling toward our left means approaching from our right.
                if !matches!(percept.right, Some(Action::Forward | Action::Left)) {
                    percept.right = other.intent;
                }
            } else if percept.left != Some(Action::Forward) {
                percept.left = other.intent;
            }
        }
        percept
    }

    fn dummy_percept(&self, index: usize) -> Percept {
        let me = self.dummies[index].pose;
        let others = self
            .dummies
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, v)| v)
            .chain(self.primary.iter());
        self.percept(me, others)
    }

    fn advance(&self, pose: Pose, action: Action) -> Pose {
        let heading = match action {
            Action::Idle => return pose,
            Action::Forward => pose.heading,
            Action::Left => pose.heading.turn_left(),
            Action::Right => pose.heading.turn_right(),
        };
        let (columns, rows) = self.config.grid_size;
        let location = Location::new(
            (pose.location.x - 1 + heading.dx).rem_euclid(columns) + 1,
            (pose.location.y - 1 + heading.dy).rem_euclid(rows) + 1,
        );
        Pose { location, heading }
    }

    /// Advance the clock: switch lights, then move the dummy vehicles.
    ///
    /// Call once per time step before the primary agent acts.
    pub fn begin_step(&mut self) {
        self.t += 1;
        let t = self.t;
        for light in self.lights.values_mut() {
            light.update(t);
        }

        for i in 0..self.dummies.len() {
            let percept = self.dummy_percept(i);
            let vehicle = self.dummies[i];
            let Some(intent) = vehicle.intent else {
                continue;
            };
            if judge(intent, &percept, None).is_legal() {
                let pose = self.advance(vehicle.pose, intent);
                let next = self.random_move();
                self.dummies[i] = Vehicle {
                    pose,
                    intent: Some(next),
                };
            }
        }
    }

    /// Settle the deadline after the primary agent has acted.
    pub fn end_step(&mut self) -> Result<StepStatus> {
        let hard_time_limit = self.config.hard_time_limit;
        let enforce = self.config.enforce_deadline;
        let trial = self.trial.as_mut().ok_or(Error::NoActiveTrial)?;

        trial.deadline -= 1;
        trial.stats.final_deadline = trial.deadline;

        let status = if trial.stats.success {
            StepStatus::Arrived
        } else if trial.deadline <= hard_time_limit {
            StepStatus::TimeLimitReached
        } else if enforce && trial.deadline <= 0 {
            StepStatus::DeadlineExpired
        } else {
            StepStatus::Running
        };
        trial.done = status.is_done();
        Ok(status)
    }

    pub fn is_done(&self) -> bool {
        self.trial.as_ref().is_none_or(|trial| trial.done)
    }

    /// Bookkeeping for the current (or just finished) trial.
    pub fn trial_stats(&self) -> Option<&TrialStats> {
        self.trial.as_ref().map(|trial| &trial.stats)
    }

    pub fn destination(&self) -> Option<Location> {
        self.trial.as_ref().map(|trial| trial.destination)
    }
}

impl Environment for GridWorld {
    fn valid_actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn sense(&self) -> Percept {
        match &self.primary {
            Some(vehicle) => self.percept(vehicle.pose, self.dummies.iter()),
            None => Percept::empty(Light::Red),
        }
    }

    fn deadline(&self) -> Option<i32> {
        self.trial.as_ref().map(|trial| trial.deadline)
    }

    fn pose(&self) -> Option<Pose> {
        self.primary.map(|vehicle| vehicle.pose)
    }

    fn act(&mut self, action: Action, intended: Option<Action>) -> Result<f64> {
        if self.is_done() {
            return Err(Error::NoActiveTrial);
        }
        let mut vehicle = self.primary.ok_or(Error::NoActiveTrial)?;
        let percept = self.percept(vehicle.pose, self.dummies.iter());
        let violation = judge(action, &percept, intended);

        let time_penalty = match &self.trial {
            Some(trial) if self.config.enforce_deadline && trial.stats.initial_deadline > 0 => {
                let used = trial.stats.initial_deadline - trial.deadline;
                (f64::from(used) / f64::from(trial.stats.initial_deadline)).clamp(0.0, 1.0)
            }
            _ => 0.0,
        };
        let noise = 2.0 * self.rng.random::<f64>() - 1.0;
        let mut reward = noise + base_reward(action, violation, &percept, intended, time_penalty);

        vehicle.intent = intended;
        if violation.is_legal() {
            vehicle.pose = self.advance(vehicle.pose, action);
        }
        self.primary = Some(vehicle);

        let trial = self.trial.as_mut().ok_or(Error::NoActiveTrial)?;
        if vehicle.pose.location == trial.destination {
            if trial.deadline >= 0 {
                reward += ARRIVAL_BONUS;
            }
            trial.stats.success = true;
        }
        trial.stats.steps += 1;
        trial.stats.net_reward += reward;
        trial.stats.actions.record(violation);

        trace!(%action, ?violation, reward, location = %vehicle.pose.location, "primary acted");
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_world() -> GridWorld {
        let mut world = GridWorld::new(WorldConfig::default().with_dummies(0).with_seed(1)).unwrap();
        world.place_primary(TrialStart {
            start: Location::new(2, 2),
            heading: Heading::EAST,
            destination: Location::new(6, 2),
            deadline: 20,
        });
        world
    }

    #[test]
    fn test_config_validation() {
        assert!(WorldConfig::default().validate().is_ok());
        assert!(WorldConfig::default().with_grid_size(0, 6).validate().is_err());
        assert!(WorldConfig::default().with_grid_size(2, 2).validate().is_err());
        assert!(GridWorld::new(WorldConfig::default().with_grid_size(3, 3)).is_ok());
    }

    #[test]
    fn test_reset_lays_out_route() {
        let mut world = GridWorld::new(WorldConfig::default().with_seed(9)).unwrap();
        for _ in 0..50 {
            let start = world.reset().unwrap();
            let distance = start.start.distance(&start.destination);
            assert!(distance >= MIN_ROUTE_DISTANCE);
            assert_eq!(start.deadline, distance * DEADLINE_PER_DISTANCE);
            assert_eq!(world.deadline(), Some(start.deadline));
            assert_eq!(world.num_dummies(), 100);
            assert!(!world.is_done());
        }
    }

    #[test]
    fn test_green_forward_moves_east() {
        let mut world = quiet_world();
        world.set_light(Location::new(2, 2), false, 100);
        assert_eq!(world.sense().light, Light::Green);

        let reward = world.act(Action::Forward, Some(Action::Forward)).unwrap();
        assert!((1.0..3.0).contains(&reward));
        assert_eq!(world.pose().unwrap().location, Location::new(3, 2));
        assert_eq!(world.trial_stats().unwrap().actions.good, 1);
    }

    #[test]
    fn test_red_light_blocks_and_penalizes() {
        let mut world = quiet_world();
        world.set_light(Location::new(2, 2), true, 100);
        assert_eq!(world.sense().light, Light::Red);

        let reward = world.act(Action::Forward, Some(Action::Forward)).unwrap();
        assert!(reward < -9.0);
        assert_eq!(world.pose().unwrap().location, Location::new(2, 2));
        assert_eq!(world.trial_stats().unwrap().actions.major_violations, 1);
    }

    #[test]
    fn test_sense_reports_surrounding_traffic() {
        let mut world = quiet_world();
        let here = Location::new(2, 2);
        world.add_dummy(
            Pose {
                location: here,
                heading: Heading::WEST,
            },
            Action::Left,
        );
        world.add_dummy(
            Pose {
                location: here,
                heading: Heading::NORTH,
            },
            Action::Forward,
        );
        world.add_dummy(
            Pose {
                location: here,
                heading: Heading::SOUTH,
            },
            Action::Right,
        );
        // Same heading: ignored.
        world.add_dummy(
            Pose {
                location: here,
                heading: Heading::EAST,
            },
            Action::Forward,
        );

        let percept = world.sense();
        assert_eq!(percept.oncoming, Some(Action::Left));
        // Heading north while we face east: coming from our right.
        assert_eq!(percept.right, Some(Action::Forward));
        assert_eq!(percept.left, Some(Action::Right));
    }

    #[test]
    fn test_arrival_ends_trial() {
        let mut world = quiet_world();
        world.place_primary(TrialStart {
            start: Location::new(5, 2),
            heading: Heading::EAST,
            destination: Location::new(6, 2),
            deadline: 5,
        });
        world.set_light(Location::new(5, 2), false, 100);

        let reward = world.act(Action::Forward, Some(Action::Forward)).unwrap();
        assert!(reward > ARRIVAL_BONUS);
        assert_eq!(world.end_step().unwrap(), StepStatus::Arrived);
        assert!(world.is_done());

        let stats = world.trial_stats().unwrap();
        assert!(stats.success);
        assert_eq!(stats.final_deadline, 4);
        assert!(world.act(Action::Idle, None).is_err());
    }

    #[test]
    fn test_deadline_expires_when_enforced() {
        let mut world = quiet_world();
        for step in 1..=20 {
            world.begin_step();
            world.act(Action::Idle, Some(Action::Forward)).unwrap();
            let status = world.end_step().unwrap();
            if step < 20 {
                assert_eq!(status, StepStatus::Running);
            } else {
                assert_eq!(status, StepStatus::DeadlineExpired);
            }
        }
        assert!(!world.trial_stats().unwrap().success);
    }

    #[test]
    fn test_hard_time_limit_without_enforcement() {
        let mut world = GridWorld::new(
            WorldConfig::default()
                .with_dummies(0)
                .with_enforce_deadline(false)
                .with_seed(2),
        )
        .unwrap();
        world.place_primary(TrialStart {
            start: Location::new(1, 1),
            heading: Heading::NORTH,
            destination: Location::new(5, 5),
            deadline: 2,
        });
        let mut steps = 0;
        loop {
            world.begin_step();
            world.act(Action::Idle, Some(Action::Forward)).unwrap();
            steps += 1;
            if world.end_step().unwrap().is_done() {
                break;
            }
        }
        assert_eq!(steps, 102);
        assert_eq!(world.trial_stats().unwrap().final_deadline, -100);
    }

    #[test]
    fn test_position_wraps_around_grid() {
        let mut world = quiet_world();
        world.place_primary(TrialStart {
            start: Location::new(8, 3),
            heading: Heading::EAST,
            destination: Location::new(4, 3),
            deadline: 20,
        });
        world.set_light(Location::new(8, 3), false, 100);
        world.act(Action::Forward, Some(Action::Forward)).unwrap();
        assert_eq!(world.pose().unwrap().location, Location::new(1, 3));
    }

    #[test]
    fn test_dummies_keep_to_the_grid() {
        let mut world = GridWorld::new(WorldConfig::default().with_seed(5)).unwrap();
        world.reset().unwrap();
        for _ in 0..50 {
            world.begin_step();
        }
        let (columns, rows) = world.config().grid_size;
        for vehicle in &world.dummies {
            assert!((1..=columns).contains(&vehicle.pose.location.x));
            assert!((1..=rows).contains(&vehicle.pose.location.y));
        }
    }
}
