//! Wiring of world, agent and simulator from a run configuration.

use super::config::RunConfig;
use crate::{
    Result,
    pipeline::{SimulationResult, Simulator},
    ports::Observer,
    q_learning::LearningAgent,
    world::{GridWorld, RoutePlanner},
};

/// Application with dependency injection.
///
/// Owns the run configuration and creates the collaborators a simulation
/// needs. Observers are injected by the caller.
///
/// # Examples
///
/// ```no_run
/// use smartcab::app::{App, RunConfig};
///
/// let mut config = RunConfig::default().with_seed(42);
/// config.agent.learning = true;
///
/// let app = App::new(config)?;
/// let result = app.run(Vec::new())?;
/// println!("reliability: {}", result.summary.reliability);
/// # Ok::<(), smartcab::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct App {
    config: RunConfig,
}

impl App {
    /// Create an app after validating the configuration.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Build the traffic world.
    pub fn create_world(&self) -> Result<GridWorld> {
        GridWorld::new(self.config.world.clone())
    }

    /// Build a driving agent for `world` with the default route planner.
    pub fn create_agent(&self, world: &GridWorld) -> LearningAgent {
        LearningAgent::new(world, RoutePlanner::new(), &self.config.agent)
    }

    /// Build a simulator with the given observers attached.
    pub fn create_simulator(&self, observers: Vec<Box<dyn Observer>>) -> Simulator {
        observers
            .into_iter()
            .fold(Simulator::new(self.config.simulation.clone()), |sim, observer| {
                sim.with_observer(observer)
            })
    }

    /// Build everything and run a full simulation.
    pub fn run(&self, observers: Vec<Box<dyn Observer>>) -> Result<SimulationResult> {
        let (result, _agent) = self.run_with_agent(observers)?;
        Ok(result)
    }

    /// Like [`App::run`], also handing back the trained agent.
    pub fn run_with_agent(
        &self,
        observers: Vec<Box<dyn Observer>>,
    ) -> Result<(SimulationResult, LearningAgent)> {
        let mut world = self.create_world()?;
        let mut agent = self.create_agent(&world);
        let mut simulator = self.create_simulator(observers);
        let result = simulator.run(&mut world, &mut agent)?;
        Ok((result, agent))
    }
}
