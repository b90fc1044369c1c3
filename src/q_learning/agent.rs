//! The learning driving agent
//!
//! Ties the state encoder, Q-table, policy and trial schedule together
//! behind the `reset`/`update` surface the simulator drives.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    app::AgentConfig,
    ports::{Environment, Planner},
    q_learning::{
        policy::select_action,
        q_table::QTable,
        schedule::{TrialParameters, TrialSchedule},
        state::State,
    },
    types::{Action, Location},
    world::RoutePlanner,
};

/// Everything that happened in one agent step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub state: State,
    pub waypoint: Option<Action>,
    pub action: Action,
    pub reward: f64,
    pub epsilon: f64,
    pub alpha: f64,
    /// Whether this step added a new row to the Q-table
    pub new_state: bool,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent with one-step (zero-discount) updates
///
/// A non-learning agent acts uniformly at random and never touches its
/// table. A learning agent follows an ε-greedy policy whose ε comes from
/// the cosine [`TrialSchedule`].
#[derive(Debug, Clone)]
pub struct LearningAgent<P = RoutePlanner> {
    planner: P,
    valid_actions: Vec<Action>,
    learning: bool,
    q_table: QTable,
    epsilon: f64,
    alpha: f64,
    schedule: TrialSchedule,
    testing: bool,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<P: Planner> LearningAgent<P> {
    /// Create an agent for `env`, reading its valid action set once.
    pub fn new<E: Environment + ?Sized>(env: &E, planner: P, config: &AgentConfig) -> Self {
        Self {
            planner,
            valid_actions: env.valid_actions().to_vec(),
            learning: config.learning,
            q_table: QTable::new(),
            epsilon: config.epsilon,
            alpha: config.alpha,
            schedule: TrialSchedule::new(),
            testing: false,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Replace the random source outright.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.rng_seed = None;
        self
    }

    /// Prepare for a new trial.
    ///
    /// Routes the planner to `destination`, then applies the trial schedule:
    /// testing trials freeze ε and α at zero, training trials advance the
    /// trial counter and recompute ε.
    pub fn reset(&mut self, destination: Location, testing: bool) -> TrialParameters {
        self.planner.route_to(destination);
        self.testing = testing;

        let params = self.schedule.begin_trial(testing, self.alpha);
        self.epsilon = params.epsilon;
        self.alpha = params.alpha;

        debug!(
            trial = self.schedule.trial(),
            testing,
            epsilon = self.epsilon,
            alpha = self.alpha,
            "agent reset"
        );
        params
    }

    /// Encode the current percept and route suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTrial`] if the environment has no pose for
    /// the agent.
    pub fn build_state<E: Environment + ?Sized>(&self, env: &E) -> Result<(State, Option<Action>)> {
        let pose = env.pose().ok_or(Error::NoActiveTrial)?;
        let waypoint = self.planner.next_waypoint(pose);
        let percept = env.sense();
        Ok((State::encode(&percept, waypoint), waypoint))
    }

    /// Create the table row for `state` on first visit (learning only).
    pub fn create_q(&mut self, state: &State) -> bool {
        self.learning && self.q_table.ensure(state)
    }

    /// Pick an action for `state` under the current ε.
    pub fn choose_action(&mut self, state: &State) -> Result<Action> {
        select_action(
            &self.q_table,
            state,
            &self.valid_actions,
            self.epsilon,
            self.learning,
            &mut self.rng,
        )
    }

    /// Fold an observed reward into the table (learning only).
    pub fn learn(&mut self, state: &State, action: Action, reward: f64) -> Result<()> {
        if self.learning {
            let value = self.q_table.update(state, action, reward, self.alpha)?;
            trace!(%state, %action, reward, value, "q-value updated");
        }
        Ok(())
    }

    /// Run one time step: sense, choose, act, learn.
    pub fn update<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<StepRecord> {
        let (state, waypoint) = self.build_state(env)?;
        let new_state = self.create_q(&state);
        let action = self.choose_action(&state)?;
        let reward = env.act(action, waypoint)?;
        self.learn(&state, action, reward)?;

        trace!(%state, %action, reward, new_state, "agent step");
        Ok(StepRecord {
            state,
            waypoint,
            action,
            reward,
            epsilon: self.epsilon,
            alpha: self.alpha,
            new_state,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn is_testing(&self) -> bool {
        self.testing
    }

    /// Training trials started so far.
    pub fn trial(&self) -> u32 {
        self.schedule.trial()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}
