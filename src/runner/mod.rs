//! Repeated execution of the target program.
//!
//! The analysis core never launches processes itself; this module is the
//! collaborator that runs the instrumented target program N times,
//! captures stdout/exit codes, times each run, and scans output for
//! configured flags. The instrumented program writes one raw trace file
//! per run into a trace directory beneath its working directory, which
//! the trace adapter then reads back.

mod executor;

pub use executor::ProgramRunner;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::diversity::mean;

/// Default name of the directory the instrumented program writes traces to.
pub const DEFAULT_TRACE_DIR: &str = "trace_output";

/// Configuration for repeated program execution.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program on every run.
    pub args: Vec<String>,
    /// Number of runs.
    pub runs: usize,
    /// Working directory for the program; the trace directory appears
    /// beneath it.
    pub working_dir: PathBuf,
    /// Name of the trace directory, relative to the working directory.
    /// Removed before the first run so stale traces never leak into a
    /// fresh batch.
    pub trace_dir: String,
    /// Substrings scanned for in program stdout; matching lines are
    /// counted per distinct line.
    pub output_flags: Vec<String>,
    /// Per-run timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl RunnerConfig {
    /// Creates a configuration for running `program` `runs` times.
    pub fn new(program: impl Into<String>, args: Vec<String>, runs: usize) -> Self {
        Self {
            program: program.into(),
            args,
            runs,
            working_dir: PathBuf::from("."),
            trace_dir: DEFAULT_TRACE_DIR.to_string(),
            output_flags: Vec::new(),
            timeout: None,
        }
    }

    /// Sets the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Sets the trace directory name.
    pub fn with_trace_dir(mut self, dir: impl Into<String>) -> Self {
        self.trace_dir = dir.into();
        self
    }

    /// Sets the stdout flags to scan for.
    pub fn with_output_flags(mut self, flags: Vec<String>) -> Self {
        self.output_flags = flags;
        self
    }

    /// Sets the per-run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Absolute path of the trace directory.
    pub fn trace_path(&self) -> PathBuf {
        self.working_dir.join(&self.trace_dir)
    }
}

/// Outcome of a batch of runs.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Wall-clock runtime of each run in milliseconds, in run order.
    pub runtimes_ms: Vec<f64>,
    /// Count per distinct stdout line that matched an output flag.
    pub flag_counts: HashMap<String, u64>,
    /// Number of runs that exited with a non-zero status.
    pub failed_runs: usize,
}

impl RunSummary {
    /// Mean wall-clock runtime across all runs, in milliseconds.
    pub fn average_runtime_ms(&self) -> f64 {
        mean(&self.runtimes_ms)
    }
}
