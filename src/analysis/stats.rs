//! Statistical analysis of simulation runs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    q_learning::TrialParameters,
    world::{ActionCounts, TrialStats},
};

/// One finished trial, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub testing: bool,
    pub epsilon: f64,
    pub alpha: f64,
    pub initial_deadline: i32,
    pub final_deadline: i32,
    pub steps: u32,
    pub net_reward: f64,
    pub good_actions: u32,
    pub minor_violations: u32,
    pub major_violations: u32,
    pub minor_accidents: u32,
    pub major_accidents: u32,
    pub success: bool,
}

impl TrialRecord {
    pub fn new(trial: usize, testing: bool, params: TrialParameters, stats: &TrialStats) -> Self {
        Self {
            trial,
            testing,
            epsilon: params.epsilon,
            alpha: params.alpha,
            initial_deadline: stats.initial_deadline,
            final_deadline: stats.final_deadline,
            steps: stats.steps,
            net_reward: stats.net_reward,
            good_actions: stats.actions.good,
            minor_violations: stats.actions.minor_violations,
            major_violations: stats.actions.major_violations,
            minor_accidents: stats.actions.minor_accidents,
            major_accidents: stats.actions.major_accidents,
            success: stats.success,
        }
    }

    pub fn actions(&self) -> ActionCounts {
        ActionCounts {
            good: self.good_actions,
            minor_violations: self.minor_violations,
            major_violations: self.major_violations,
            minor_accidents: self.minor_accidents,
            major_accidents: self.major_accidents,
        }
    }
}

/// Letter grade for reliability and safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::APlus => "A+",
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::F => "F",
        };
        f.pad(label)
    }
}

/// Grade the fraction of trials that reached their destination.
pub fn rate_reliability(success_rate: f64) -> Rating {
    if success_rate >= 1.0 {
        Rating::APlus
    } else if success_rate >= 0.9 {
        Rating::A
    } else if success_rate >= 0.8 {
        Rating::B
    } else if success_rate >= 0.7 {
        Rating::C
    } else if success_rate >= 0.6 {
        Rating::D
    } else {
        Rating::F
    }
}

/// Grade driving safety from the worst kind of bad action observed.
pub fn rate_safety(actions: &ActionCounts) -> Rating {
    if actions.major_accidents > 0 {
        Rating::F
    } else if actions.minor_accidents > 0 {
        let share = f64::from(actions.minor_accidents) / f64::from(actions.total().max(1));
        if share < 0.05 { Rating::C } else { Rating::D }
    } else if actions.major_violations > 0 {
        Rating::B
    } else if actions.minor_violations > 0 {
        Rating::A
    } else {
        Rating::APlus
    }
}

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub training_trials: usize,
    pub testing_trials: usize,
    pub training_success_rate: f64,
    pub testing_success_rate: f64,
    /// Mean reward per action over the graded trials
    pub average_reward: f64,
    /// Action tally over the graded trials
    pub actions: ActionCounts,
    pub reliability: Rating,
    pub safety: Rating,
    /// States in the agent's Q-table at the end of the run
    pub states_learned: usize,
}

fn success_rate(records: &[&TrialRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|r| r.success).count() as f64 / records.len() as f64
}

impl RunSummary {
    /// Summarize trial records.
    ///
    /// Ratings are computed over the testing trials, or over every trial
    /// when none were testing.
    pub fn from_trials(records: &[TrialRecord], states_learned: usize) -> Self {
        let (testing, training): (Vec<&TrialRecord>, Vec<&TrialRecord>) =
            records.iter().partition(|r| r.testing);
        let graded: Vec<&TrialRecord> = if testing.is_empty() {
            records.iter().collect()
        } else {
            testing.clone()
        };

        let mut actions = ActionCounts::default();
        let mut total_reward = 0.0;
        for record in &graded {
            actions.merge(&record.actions());
            total_reward += record.net_reward;
        }
        let average_reward = if actions.total() > 0 {
            total_reward / f64::from(actions.total())
        } else {
            0.0
        };

        Self {
            training_trials: training.len(),
            testing_trials: testing.len(),
            training_success_rate: success_rate(&training),
            testing_success_rate: success_rate(&testing),
            average_reward,
            actions,
            reliability: rate_reliability(success_rate(&graded)),
            safety: rate_safety(&actions),
            states_learned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trial: usize, testing: bool, success: bool, actions: ActionCounts) -> TrialRecord {
        let stats = TrialStats {
            initial_deadline: 20,
            final_deadline: 5,
            steps: actions.total(),
            net_reward: f64::from(actions.total()),
            actions,
            success,
        };
        let params = TrialParameters {
            epsilon: 0.5,
            alpha: 0.5,
        };
        TrialRecord::new(trial, testing, params, &stats)
    }

    fn clean(good: u32) -> ActionCounts {
        ActionCounts {
            good,
            ..ActionCounts::default()
        }
    }

    #[test]
    fn test_reliability_grades() {
        assert_eq!(rate_reliability(1.0), Rating::APlus);
        assert_eq!(rate_reliability(0.9), Rating::A);
        assert_eq!(rate_reliability(0.85), Rating::B);
        assert_eq!(rate_reliability(0.7), Rating::C);
        assert_eq!(rate_reliability(0.6), Rating::D);
        assert_eq!(rate_reliability(0.1), Rating::F);
    }

    #[test]
    fn test_safety_grades() {
        assert_eq!(rate_safety(&clean(10)), Rating::APlus);

        let mut actions = clean(10);
        actions.minor_violations = 2;
        assert_eq!(rate_safety(&actions), Rating::A);
        actions.major_violations = 1;
        assert_eq!(rate_safety(&actions), Rating::B);
        actions.good = 100;
        actions.minor_accidents = 1;
        assert_eq!(rate_safety(&actions), Rating::C);
        actions.minor_accidents = 20;
        assert_eq!(rate_safety(&actions), Rating::D);
        actions.major_accidents = 1;
        assert_eq!(rate_safety(&actions), Rating::F);
    }

    #[test]
    fn test_summary_grades_testing_trials() {
        let mut bad = clean(5);
        bad.major_accidents = 1;
        let records = vec![
            record(1, false, false, bad),
            record(2, false, true, clean(6)),
            record(1, true, true, clean(8)),
            record(2, true, true, clean(8)),
        ];
        let summary = RunSummary::from_trials(&records, 12);

        assert_eq!(summary.training_trials, 2);
        assert_eq!(summary.testing_trials, 2);
        assert_eq!(summary.training_success_rate, 0.5);
        assert_eq!(summary.testing_success_rate, 1.0);
        assert_eq!(summary.reliability, Rating::APlus);
        assert_eq!(summary.safety, Rating::APlus);
        assert_eq!(summary.actions.total(), 16);
        assert_eq!(summary.average_reward, 1.0);
        assert_eq!(summary.states_learned, 12);
    }

    #[test]
    fn test_summary_without_testing_grades_everything() {
        let mut bad = clean(5);
        bad.major_accidents = 1;
        let records = vec![record(1, false, false, bad), record(2, false, true, clean(6))];
        let summary = RunSummary::from_trials(&records, 0);
        assert_eq!(summary.testing_trials, 0);
        assert_eq!(summary.safety, Rating::F);
        assert_eq!(summary.reliability, Rating::F);
    }

    #[test]
    fn test_rating_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Rating::APlus).unwrap(), "\"A+\"");
        assert_eq!(Rating::APlus.to_string(), "A+");
    }
}
