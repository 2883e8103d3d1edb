//! Trace-to-signature encoding.
//!
//! Converts raw traces into interleaving signatures: compact strings in
//! which each event becomes one or two symbol characters. Two signatures
//! are equal exactly when their traces are indistinguishable under the
//! active encoding configuration, which makes string equality the basis
//! for unique-interleaving counting and string distance the basis for
//! diversity scoring.
//!
//! Symbol scoping is deliberately asymmetric:
//!
//! - **Thread symbols** are per-trace. Thread ids are run-local (the same
//!   logical thread gets different ids across runs), so each trace gets a
//!   fresh normalized mapping starting at 0.
//! - **Location symbols** are batch-scoped. Location ids are stable
//!   program points comparable across runs, so one table spans the whole
//!   batch and the same location key always yields the same symbol.
//!
//! Unifying the two scopes would change the equality semantics of
//! signatures.

mod encoder;
mod symbols;

pub use encoder::{encode, encode_batch};
pub use symbols::{symbol_for, LocationKey, SymbolTable, SYMBOL_CAPACITY};

/// Configuration for signature encoding.
///
/// Fixed once per analysis batch; every trace in the batch is encoded
/// under the same configuration.
#[derive(Debug, Clone, Default)]
pub struct EncodingConfig {
    /// Omit the thread symbol from each token, encoding only locations.
    pub disable_thread_ids: bool,

    /// Assign thread symbols in sorted numeric id order instead of
    /// first-appearance order.
    pub unordered_thread_mapping: bool,

    /// Distinguish repeated visits to the same location by the same
    /// thread, so the 3rd visit to a location gets a different symbol
    /// than the 1st.
    pub unique_trace_locations: bool,
}

impl EncodingConfig {
    /// Creates the default configuration: thread ids included,
    /// first-appearance thread ordering, repeated visits not distinguished.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables thread symbols in tokens.
    pub fn without_thread_ids(mut self) -> Self {
        self.disable_thread_ids = true;
        self
    }

    /// Enables sorted-id thread symbol assignment.
    pub fn with_unordered_thread_mapping(mut self) -> Self {
        self.unordered_thread_mapping = true;
        self
    }

    /// Enables per-thread repetition counters on location keys.
    pub fn with_unique_trace_locations(mut self) -> Self {
        self.unique_trace_locations = true;
        self
    }
}
