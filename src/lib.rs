//! interleave-bench: thread-interleaving diversity analysis for concurrent programs.
//!
//! Repeated executions of a concurrent program each produce a raw event
//! trace (a sequence of `(threadId, locationId)` observations). This library
//! encodes those traces into compact comparable strings ("interleaving
//! signatures"), computes pairwise dissimilarity between signatures with a
//! selectable string metric, and aggregates diversity statistics across
//! multiple run-count cutoffs.

// Core modules
pub mod cli;
pub mod distance;
pub mod diversity;
pub mod encoding;
pub mod error;
pub mod report;
pub mod runner;
pub mod trace;

// Re-export commonly used error types
pub use error::{AnalysisError, DistanceError, EncodingError, RunnerError, TraceError};
