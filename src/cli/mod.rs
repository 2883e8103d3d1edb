//! Command-line interface for interleave-bench.
//!
//! Provides commands for analyzing trace directories, running the target
//! program repeatedly, and sweeping variable-argument sets.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
