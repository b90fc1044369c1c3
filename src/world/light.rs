//! Traffic lights at grid intersections

use rand::Rng;

use crate::types::{Heading, Light};

/// Periods (in steps) a light may be assigned.
const PERIODS: [u64; 3] = [3, 4, 5];

/// Two-phase light: either the north-south or the east-west axis is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficLight {
    north_south_open: bool,
    period: u64,
    last_switch: u64,
}

impl TrafficLight {
    pub fn new(north_south_open: bool, period: u64) -> Self {
        Self {
            north_south_open,
            period: period.max(1),
            last_switch: 0,
        }
    }

    /// Treat `t` as the moment of the last switch.
    pub fn switched_at(mut self, t: u64) -> Self {
        self.last_switch = t;
        self
    }

    /// Light with a random phase and period.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let period = PERIODS[rng.random_range(0..PERIODS.len())];
        Self::new(rng.random_bool(0.5), period)
    }

    /// Toggle the open axis once `period` steps have elapsed.
    pub fn update(&mut self, t: u64) {
        if t.saturating_sub(self.last_switch) >= self.period {
            self.north_south_open = !self.north_south_open;
            self.last_switch = t;
        }
    }

    /// Colour seen by a vehicle travelling along `heading`.
    pub fn light_for(&self, heading: Heading) -> Light {
        if heading.is_vertical() == self.north_south_open {
            Light::Green
        } else {
            Light::Red
        }
    }

    pub fn north_south_open(&self) -> bool {
        self.north_south_open
    }

    pub fn period(&self) -> u64 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_colour_by_axis() {
        let light = TrafficLight::new(true, 3);
        assert_eq!(light.light_for(Heading::NORTH), Light::Green);
        assert_eq!(light.light_for(Heading::SOUTH), Light::Green);
        assert_eq!(light.light_for(Heading::EAST), Light::Red);
        assert_eq!(light.light_for(Heading::WEST), Light::Red);
    }

    #[test]
    fn test_light_toggles_every_period() {
        let mut light = TrafficLight::new(false, 3);
        for t in 1..3 {
            light.update(t);
            assert!(!light.north_south_open());
        }
        light.update(3);
        assert!(light.north_south_open());
        light.update(5);
        assert!(light.north_south_open());
        light.update(6);
        assert!(!light.north_south_open());
    }
}
