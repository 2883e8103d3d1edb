//! Diversity aggregation across run-count cutoffs.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceAlgorithm;
use crate::error::AnalysisError;

use super::stats::{mean, population_std_dev};

/// Placeholder distance reported when coverage analysis is disabled.
///
/// Degenerate sentinel inherited from the original tooling's fast path,
/// not a meaningful statistic: downstream consumers that see an average
/// distance of exactly 1 with zero deviation under disabled coverage
/// should treat the pairwise statistics as "not computed".
pub const COVERAGE_DISABLED_PLACEHOLDER: f64 = 1.0;

/// Diversity statistics for one run-count prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityReport {
    /// Number of distinct signatures in the prefix (exact string equality).
    pub unique_count: usize,

    /// Mean cardinality over the set of distinct clusters. A cluster of
    /// size 5 and one of size 1 average to 3, regardless of how many runs
    /// each holds.
    pub average_cluster_size: f64,

    /// Arithmetic mean of the pairwise metric values. 0.0 when the prefix
    /// holds a single run (no pairs).
    pub average_distance: f64,

    /// Population standard deviation of the pairwise metric values.
    pub distance_std_dev: f64,
}

/// Computes diversity reports for each requested cutoff.
///
/// Each cutoff selects the first `cutoff` signatures in run order and is
/// analyzed independently. The returned map is keyed by cutoff, so
/// iteration follows ascending numeric order regardless of input order;
/// duplicate cutoffs collapse to one entry.
///
/// The pairwise-distance step evaluates all `c·(c-1)/2` unordered pairs
/// per cutoff - quadratic in the cutoff. Pairs are independent, so the
/// evaluation is parallelized with rayon; only floating-point summation
/// order can vary between invocations. When `coverage` is false the pair
/// list is replaced by the degenerate placeholder
/// [`COVERAGE_DISABLED_PLACEHOLDER`].
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when a cutoff is 0 or exceeds the
/// number of signatures; [`crate::error::DistanceError::LengthMismatch`]
/// (via `AnalysisError::Distance`) fails the whole analysis when Hamming
/// meets unequal-length signatures.
pub fn analyze(
    signatures: &[String],
    cutoffs: &[usize],
    algorithm: DistanceAlgorithm,
    coverage: bool,
) -> Result<BTreeMap<usize, DiversityReport>, AnalysisError> {
    let mut reports = BTreeMap::new();
    for &cutoff in cutoffs {
        if reports.contains_key(&cutoff) {
            continue;
        }
        let report = analyze_prefix(signatures, cutoff, algorithm, coverage)?;
        debug!(
            cutoff,
            unique = report.unique_count,
            avg_distance = report.average_distance,
            "analyzed prefix"
        );
        reports.insert(cutoff, report);
    }
    Ok(reports)
}

fn analyze_prefix(
    signatures: &[String],
    cutoff: usize,
    algorithm: DistanceAlgorithm,
    coverage: bool,
) -> Result<DiversityReport, AnalysisError> {
    if cutoff == 0 || cutoff > signatures.len() {
        return Err(AnalysisError::InsufficientData {
            cutoff,
            available: signatures.len(),
        });
    }

    let prefix = &signatures[..cutoff];

    let mut clusters: HashMap<&str, usize> = HashMap::new();
    for signature in prefix {
        *clusters.entry(signature.as_str()).or_insert(0) += 1;
    }
    let unique_count = clusters.len();
    let cluster_sizes: Vec<f64> = clusters.values().map(|&size| size as f64).collect();
    let average_cluster_size = mean(&cluster_sizes);

    let distances = if coverage {
        pairwise_distances(prefix, algorithm)?
    } else {
        vec![COVERAGE_DISABLED_PLACEHOLDER]
    };

    Ok(DiversityReport {
        unique_count,
        average_cluster_size,
        average_distance: mean(&distances),
        distance_std_dev: population_std_dev(&distances),
    })
}

/// Evaluates the metric over all unordered index pairs of the prefix.
fn pairwise_distances(
    prefix: &[String],
    algorithm: DistanceAlgorithm,
) -> Result<Vec<f64>, AnalysisError> {
    let metric = algorithm.metric();

    let pairs: Vec<(usize, usize)> = (0..prefix.len())
        .flat_map(|x| ((x + 1)..prefix.len()).map(move |y| (x, y)))
        .collect();

    let distances = pairs
        .par_iter()
        .map(|&(x, y)| metric(&prefix[x], &prefix[y]))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(distances)
}
