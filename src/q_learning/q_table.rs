//! Q-table implementation for one-step learning

use std::{collections::HashMap, io::Write};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::state::State,
    types::Action,
};

/// Value estimates for every action in one state.
///
/// Fixed width, so a row always covers all four actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionValues([f64; 4]);

impl ActionValues {
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    /// Maximum value in the row.
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose value equals the row maximum.
    pub fn argmax(&self) -> Vec<Action> {
        let best = self.max();
        Action::ALL
            .into_iter()
            .filter(|&action| self.get(action) == best)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::ALL.into_iter().map(|action| (action, self.get(action)))
    }
}

/// Q-table mapping states to per-action value estimates
///
/// Rows are created on first visit, zero-initialized, and never removed.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    rows: HashMap<State, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a zeroed row for `state` unless one already exists.
    ///
    /// Returns `true` when a row was created.
    pub fn ensure(&mut self, state: &State) -> bool {
        if self.rows.contains_key(state) {
            return false;
        }
        self.rows.insert(*state, ActionValues::default());
        true
    }

    pub fn contains(&self, state: &State) -> bool {
        self.rows.contains_key(state)
    }

    /// Row for `state`, if it has been visited.
    pub fn row(&self, state: &State) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    fn require(&self, state: &State) -> Result<&ActionValues> {
        self.rows.get(state).ok_or_else(|| Error::UnknownState {
            state: state.label(),
        })
    }

    /// Current estimate for a state-action pair
    pub fn value(&self, state: &State, action: Action) -> Result<f64> {
        Ok(self.require(state)?.get(action))
    }

    /// Maximum Q-value over all actions in a state
    pub fn best_value(&self, state: &State) -> Result<f64> {
        Ok(self.require(state)?.max())
    }

    /// Actions sharing the maximal Q-value (more than one on ties)
    pub fn best_actions(&self, state: &State) -> Result<Vec<Action>> {
        Ok(self.require(state)?.argmax())
    }

    /// One-step update with no bootstrapped future term
    ///
    /// Q(s,a) ← Q(s,a) + α[r - Q(s,a)]
    pub fn update(&mut self, state: &State, action: Action, reward: f64, alpha: f64) -> Result<f64> {
        let row = self.rows.get_mut(state).ok_or_else(|| Error::UnknownState {
            state: state.label(),
        })?;
        let current_q = row.get(action);
        let new_q = current_q + alpha * (reward - current_q);
        row.set(action, new_q);
        Ok(new_q)
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &ActionValues)> {
        self.rows.iter()
    }

    /// Write every row, sorted by state, in a human-readable layout.
    pub fn write_report<W: Write>(&self, mut out: W) -> Result<()> {
        let mut states: Vec<&State> = self.rows.keys().collect();
        states.sort();

        writeln!(out, "/-----------------------------------------")?;
        writeln!(out, "| State-action rewards from Q-Learning")?;
        writeln!(out, "\\-----------------------------------------")?;
        writeln!(out, "# state = waypoint|right|left|oncoming")?;
        for state in states {
            writeln!(out)?;
            writeln!(out, "{state}")?;
            for (action, value) in self.rows[state].iter() {
                writeln!(out, " -- {action:<8} : {value:.2}")?;
            }
        }
        Ok(())
    }
}
