//! Command-line interface for prism.
//!
//! Provides commands for running two-sided debates and managing lenses.

mod commands;

pub use commands::{parse_cli, run, run_with_cli};
