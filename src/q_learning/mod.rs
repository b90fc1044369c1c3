//! Tabular Q-learning for the driving agent
//!
//! The agent learns a value for every (state, action) pair it visits:
//!
//! - **State encoding** ([`State`]): waypoint plus the traffic seen on the
//!   right, left and oncoming sides.
//! - **Q-table** ([`QTable`]): rows created lazily, zero-initialized.
//! - **Policy** ([`select_action`]): ε-greedy with random tie-breaking.
//! - **Update**: `Q(s,a) ← Q(s,a) + α[r - Q(s,a)]`. There is no discounted
//!   future term; only the immediate reward is learned.
//! - **Schedule** ([`TrialSchedule`]): `ε = |cos(α·t)|` per training trial,
//!   `ε = α = 0` when testing.
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::{
//!     app::AgentConfig,
//!     q_learning::LearningAgent,
//!     world::{GridWorld, RoutePlanner, WorldConfig},
//! };
//!
//! # fn main() -> smartcab::Result<()> {
//! let mut world = GridWorld::new(WorldConfig::default().with_seed(7))?;
//! let config = AgentConfig::new().with_learning(true).with_alpha(0.5);
//! let mut agent = LearningAgent::new(&world, RoutePlanner::new(), &config);
//!
//! let start = world.reset()?;
//! agent.reset(start.destination, false);
//! world.begin_step();
//! agent.update(&mut world)?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod policy;
pub mod q_table;
pub mod schedule;
pub mod state;

// Public re-exports
pub use agent::{LearningAgent, StepRecord};
pub use policy::select_action;
pub use q_table::{ActionValues, QTable};
pub use schedule::{TrialParameters, TrialSchedule};
pub use state::State;
