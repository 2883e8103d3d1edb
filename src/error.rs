//! Error types for interleave-bench operations.
//!
//! Defines error types for the major subsystems:
//! - Trace file reading and line parsing
//! - Symbol allocation and signature encoding
//! - Distance metric evaluation
//! - Diversity aggregation
//! - Target program execution

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading raw traces.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A trace line did not parse into `(threadId, locationId)`.
    /// The offending run is rejected as a whole, never silently skipped.
    #[error("Malformed trace line {line} in '{file}': {content:?}")]
    MalformedLine {
        file: String,
        line: usize,
        content: String,
    },

    #[error("Trace directory '{0}' not found")]
    DirectoryNotFound(PathBuf),

    #[error("No trace files found in '{0}'")]
    NoTraces(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during signature encoding.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The symbol codespace is exhausted. Fatal for the batch: continuing
    /// would silently corrupt signature equality.
    #[error("Symbol codespace exhausted: index {index} exceeds capacity {capacity}")]
    CapacityExceeded { index: u64, capacity: u64 },

    /// A trace uses more threads than the symbol table reserved, which
    /// would let thread symbols collide with location symbols.
    #[error("Trace uses {threads} threads but the symbol table reserves {reserved} thread symbols")]
    ThreadReserveExceeded { threads: usize, reserved: usize },
}

/// Errors that can occur during distance computation.
#[derive(Debug, Error)]
pub enum DistanceError {
    /// Hamming distance is only defined for equal-length signatures.
    #[error("Hamming distance requires equal-length signatures (got {left} and {right} symbols)")]
    LengthMismatch { left: usize, right: usize },
}

/// Errors that can occur during diversity aggregation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A requested cutoff does not select a non-empty prefix of the run
    /// list, so "no diversity" cannot be distinguished from "not enough
    /// runs collected".
    #[error("Insufficient data for cutoff {cutoff}: {available} runs available")]
    InsufficientData { cutoff: usize, available: usize },

    #[error(transparent)]
    Distance(#[from] DistanceError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Errors that can occur while running the target program.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Run {run} timed out after {seconds} seconds")]
    Timeout { run: usize, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
