//! String-distance metrics over interleaving signatures.
//!
//! The diversity aggregator treats the chosen metric as an opaque binary
//! function with a stated direction: distance-like metrics grow when
//! signatures differ, similarity-like metrics grow when they agree. The
//! metric is selected once per analysis run and applied uniformly to all
//! pairs.

mod metrics;

pub use metrics::{damerau_levenshtein, hamming, jaro, jaro_winkler, levenshtein};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DistanceError;

/// A signature-pair metric, dispatched once at configuration time.
pub type MetricFn = fn(&str, &str) -> Result<f64, DistanceError>;

/// Whether larger metric values mean more different or more alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricDirection {
    /// Larger values mean more different (edit distances, Hamming).
    DistanceLike,
    /// Larger values mean more alike (Jaro, Jaro-Winkler).
    SimilarityLike,
}

/// The closed set of supported signature metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceAlgorithm {
    /// Unit-cost insert/delete/substitute edit distance.
    Levenshtein,
    /// Edit distance with adjacent transposition as a unit-cost operation.
    DamerauLevenshtein,
    /// Jaro similarity.
    Jaro,
    /// Jaro similarity with the Winkler common-prefix bonus.
    JaroWinkler,
    /// Position-wise mismatch count; only defined for equal-length inputs.
    Hamming,
}

impl DistanceAlgorithm {
    /// The metric's directionality.
    pub fn direction(&self) -> MetricDirection {
        match self {
            Self::Levenshtein | Self::DamerauLevenshtein | Self::Hamming => {
                MetricDirection::DistanceLike
            }
            Self::Jaro | Self::JaroWinkler => MetricDirection::SimilarityLike,
        }
    }

    /// The value the metric assigns to a pair of identical signatures.
    pub fn identity(&self) -> f64 {
        match self.direction() {
            MetricDirection::DistanceLike => 0.0,
            MetricDirection::SimilarityLike => 1.0,
        }
    }

    /// Resolves the algorithm to its metric function.
    ///
    /// Callers evaluating many pairs should resolve once and reuse the
    /// returned function rather than re-selecting per pair.
    pub fn metric(&self) -> MetricFn {
        match self {
            Self::Levenshtein => |a, b| Ok(levenshtein(a, b) as f64),
            Self::DamerauLevenshtein => |a, b| Ok(damerau_levenshtein(a, b) as f64),
            Self::Jaro => |a, b| Ok(jaro(a, b)),
            Self::JaroWinkler => |a, b| Ok(jaro_winkler(a, b)),
            Self::Hamming => |a, b| hamming(a, b).map(|d| d as f64),
        }
    }

    /// Convenience wrapper evaluating the metric for one pair.
    pub fn compute(&self, a: &str, b: &str) -> Result<f64, DistanceError> {
        self.metric()(a, b)
    }
}

impl fmt::Display for DistanceAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Levenshtein => "Levenshtein",
            Self::DamerauLevenshtein => "Damerau-Levenshtein",
            Self::Jaro => "Jaro",
            Self::JaroWinkler => "Jaro-Winkler",
            Self::Hamming => "Hamming",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DistanceAlgorithm {
    type Err = String;

    /// Accepts metric names (case-insensitive) and the numeric codes the
    /// original tooling used (0-4).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "levenshtein" | "edit" | "0" => Ok(Self::Levenshtein),
            "damerau-levenshtein" | "damerau" | "1" => Ok(Self::DamerauLevenshtein),
            "jaro" | "2" => Ok(Self::Jaro),
            "jaro-winkler" | "3" => Ok(Self::JaroWinkler),
            "hamming" | "4" => Ok(Self::Hamming),
            unknown => Err(format!(
                "invalid distance algorithm '{unknown}' (expected levenshtein, \
                 damerau-levenshtein, jaro, jaro-winkler, hamming, or a code 0-4)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DistanceAlgorithm; 5] = [
        DistanceAlgorithm::Levenshtein,
        DistanceAlgorithm::DamerauLevenshtein,
        DistanceAlgorithm::Jaro,
        DistanceAlgorithm::JaroWinkler,
        DistanceAlgorithm::Hamming,
    ];

    #[test]
    fn self_distance_is_the_identity_value() {
        for algorithm in ALL {
            let value = algorithm.compute("abcabc", "abcabc").expect("compute");
            assert_eq!(value, algorithm.identity(), "{algorithm}");
        }
    }

    #[test]
    fn metrics_are_symmetric() {
        let pairs = [("abc", "acb"), ("aaaa", "abca"), ("xyxy", "yxyx")];
        for algorithm in ALL {
            for (a, b) in pairs {
                let forward = algorithm.compute(a, b).expect("compute");
                let backward = algorithm.compute(b, a).expect("compute");
                assert_eq!(forward, backward, "{algorithm} on ({a}, {b})");
            }
        }
    }

    #[test]
    fn parses_names_and_numeric_codes() {
        assert_eq!(
            "levenshtein".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::Levenshtein)
        );
        assert_eq!(
            "Jaro-Winkler".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::JaroWinkler)
        );
        assert_eq!(
            "1".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::DamerauLevenshtein)
        );
        assert_eq!(
            "4".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::Hamming)
        );
        assert!("cosine".parse::<DistanceAlgorithm>().is_err());
    }

    #[test]
    fn display_names_match_report_labels() {
        assert_eq!(DistanceAlgorithm::DamerauLevenshtein.to_string(), "Damerau-Levenshtein");
        assert_eq!(DistanceAlgorithm::JaroWinkler.to_string(), "Jaro-Winkler");
    }

    #[test]
    fn directions_are_fixed() {
        assert_eq!(
            DistanceAlgorithm::Levenshtein.direction(),
            MetricDirection::DistanceLike
        );
        assert_eq!(
            DistanceAlgorithm::Jaro.direction(),
            MetricDirection::SimilarityLike
        );
        assert_eq!(DistanceAlgorithm::Hamming.identity(), 0.0);
        assert_eq!(DistanceAlgorithm::JaroWinkler.identity(), 1.0);
    }
}
