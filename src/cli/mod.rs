//! CLI infrastructure for the smartcab simulator
//!
//! This module provides the command-line interface for running training
//! and testing sessions and for producing configuration files.

pub mod commands;
pub mod output;
