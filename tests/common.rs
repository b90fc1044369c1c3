//! Shared fixtures for the smartcab integration tests.

#![allow(dead_code)]

use smartcab::{
    app::RunConfig,
    pipeline::SimulationConfig,
    types::{Heading, Location},
    world::{GridWorld, TrialStart, WorldConfig},
};

/// A short learning run: three training trials at α = 0.5 and tolerance
/// 0.1 (cos(1.5) ≈ 0.07), then `n_test` testing trials.
pub fn short_learning_config(seed: u64, n_test: usize) -> RunConfig {
    let mut config = RunConfig {
        world: WorldConfig::default().with_dummies(5),
        simulation: SimulationConfig {
            tolerance: 0.1,
            n_test,
            min_training_trials: 2,
            max_training_trials: 10,
            update_delay_ms: 0,
        },
        ..RunConfig::default()
    }
    .with_seed(seed);
    config.agent.learning = true;
    config.agent.alpha = 0.5;
    config
}

/// An empty grid with the primary agent placed on a fixed route.
pub fn empty_world(seed: u64, deadline: i32) -> (GridWorld, TrialStart) {
    let config = WorldConfig::default().with_dummies(0).with_seed(seed);
    let mut world = GridWorld::new(config).unwrap();
    let layout = TrialStart {
        start: Location::new(1, 1),
        heading: Heading::EAST,
        destination: Location::new(5, 3),
        deadline,
    };
    world.place_primary(layout);
    (world, layout)
}
