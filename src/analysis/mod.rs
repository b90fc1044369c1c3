//! Trial records and run-level statistics

pub mod stats;

pub use stats::{Rating, RunSummary, TrialRecord, rate_reliability, rate_safety};
