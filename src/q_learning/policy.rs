//! ε-greedy action selection with random tie-breaking

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    q_learning::{q_table::QTable, state::State},
    types::Action,
};

/// Select an action for `state`.
///
/// A non-learning agent ignores the table and picks uniformly from
/// `valid_actions`. A learning agent explores with probability `epsilon`
/// and otherwise picks uniformly among the best-valued actions, so equal
/// values never favour a fixed ordering.
///
/// # Errors
///
/// Returns [`Error::EmptyActionSet`] if `valid_actions` is empty and
/// [`Error::UnknownState`] if exploitation hits a state with no row.
pub fn select_action<R: Rng + ?Sized>(
    table: &QTable,
    state: &State,
    valid_actions: &[Action],
    epsilon: f64,
    learning: bool,
    rng: &mut R,
) -> Result<Action> {
    if valid_actions.is_empty() {
        return Err(Error::EmptyActionSet);
    }

    if !learning || rng.random::<f64>() < epsilon {
        return explore(valid_actions, rng);
    }

    let best = table.best_actions(state)?;
    best.choose(rng).copied().ok_or(Error::EmptyActionSet)
}

fn explore<R: Rng + ?Sized>(valid_actions: &[Action], rng: &mut R) -> Result<Action> {
    valid_actions
        .choose(rng)
        .copied()
        .ok_or(Error::EmptyActionSet)
}
