//! Per-trial exploration and learning-rate schedule

use serde::{Deserialize, Serialize};

/// Exploration and learning rates in force for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialParameters {
    pub epsilon: f64,
    pub alpha: f64,
}

/// Trial counter driving the cosine exploration curve.
///
/// Training trials set `epsilon = |cos(alpha * t)|` using the current
/// learning rate as the decay coefficient. The curve oscillates between
/// 0 and 1 rather than decaying monotonically. Testing trials freeze the
/// policy with `epsilon = alpha = 0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialSchedule {
    trial: u32,
}

impl TrialSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of training trials started so far.
    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// Parameters for the next trial, given the current learning rate.
    ///
    /// Only training trials advance the counter.
    pub fn begin_trial(&mut self, testing: bool, alpha: f64) -> TrialParameters {
        if testing {
            return TrialParameters {
                epsilon: 0.0,
                alpha: 0.0,
            };
        }

        self.trial += 1;
        TrialParameters {
            epsilon: (alpha * f64::from(self.trial)).cos().abs(),
            alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_schedule_values() {
        let mut schedule = TrialSchedule::new();
        let first = schedule.begin_trial(false, 0.5);
        assert!((first.epsilon - 0.8776).abs() < 1e-4);
        assert_eq!(first.alpha, 0.5);

        let second = schedule.begin_trial(false, 0.5);
        assert!((second.epsilon - 0.5403).abs() < 1e-4);
        assert_eq!(schedule.trial(), 2);
    }

    #[test]
    fn test_schedule_is_not_monotonic() {
        let mut schedule = TrialSchedule::new();
        let eps: Vec<f64> = (0..8).map(|_| schedule.begin_trial(false, 0.5).epsilon).collect();
        // |cos(1.5)| < |cos(2.0)|: the curve rises again after its first trough.
        assert!(eps[2] < eps[3]);
        assert!(eps.iter().all(|e| (0.0..=1.0).contains(e)));
    }

    #[test]
    fn test_testing_freezes_and_keeps_counter() {
        let mut schedule = TrialSchedule::new();
        schedule.begin_trial(false, 0.5);
        let params = schedule.begin_trial(true, 0.5);
        assert_eq!(params, TrialParameters { epsilon: 0.0, alpha: 0.0 });
        assert_eq!(schedule.trial(), 1);
    }
}
