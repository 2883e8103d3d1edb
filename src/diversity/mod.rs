//! Diversity analysis over interleaving signatures.
//!
//! Given the ordered signature list of a batch (one signature per run, in
//! run order) and a set of run-count cutoffs, the analyzer reports for
//! each cutoff:
//!
//! 1. **Unique count** - distinct signatures in the prefix
//! 2. **Clusters** - groups of runs sharing an identical signature, and
//!    their mean size
//! 3. **Pairwise distance statistics** - mean and population standard
//!    deviation of the configured metric over all unordered signature
//!    pairs
//!
//! Each cutoff is processed independently rather than incrementally;
//! batches are analyzed once, not in a hot loop, so the simpler scheme
//! wins. The dominant cost is the quadratic pairwise step, which is
//! parallelized across pairs.

mod analyzer;
mod stats;

pub use analyzer::{analyze, DiversityReport, COVERAGE_DISABLED_PLACEHOLDER};
pub use stats::{mean, population_std_dev};

use std::collections::BTreeMap;

use crate::distance::DistanceAlgorithm;
use crate::encoding::{self, EncodingConfig};
use crate::error::AnalysisError;
use crate::trace::RawTrace;

/// Encodes a trace batch and analyzes it in one step.
///
/// Convenience for callers holding raw traces: builds the batch symbol
/// table, encodes every trace in run order, and feeds the signatures to
/// [`analyze`].
pub fn analyze_traces(
    traces: &[RawTrace],
    encoding_config: &EncodingConfig,
    cutoffs: &[usize],
    algorithm: DistanceAlgorithm,
    coverage: bool,
) -> Result<BTreeMap<usize, DiversityReport>, AnalysisError> {
    let (signatures, _) = encoding::encode_batch(traces, encoding_config)?;
    analyze(&signatures, cutoffs, algorithm, coverage)
}
