//! End-to-end tests for the trace analysis pipeline.
//!
//! Exercise the full path a CLI invocation takes: trace files on disk →
//! parsed runs → encoded signatures → diversity reports.

use std::fs;
use std::path::Path;

use interleave_bench::distance::DistanceAlgorithm;
use interleave_bench::diversity::{self, DiversityReport};
use interleave_bench::encoding::{self, EncodingConfig};
use interleave_bench::error::{AnalysisError, TraceError};
use interleave_bench::trace;

fn write_traces(dir: &Path, contents: &[&str]) {
    for (index, content) in contents.iter().enumerate() {
        fs::write(dir.join(format!("run-{index:03}.txt")), content).expect("write trace");
    }
}

fn analyze_dir(
    dir: &Path,
    config: &EncodingConfig,
    cutoffs: &[usize],
    algorithm: DistanceAlgorithm,
) -> Result<std::collections::BTreeMap<usize, DiversityReport>, AnalysisError> {
    let traces = trace::read_trace_dir(dir).expect("read traces");
    diversity::analyze_traces(&traces, config, cutoffs, algorithm, true)
}

#[test]
fn identical_runs_cluster_together() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n", "0 L1\n", "0 L1\n"]);

    let reports = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[3],
        DistanceAlgorithm::Levenshtein,
    )
    .expect("analyze");

    let report = &reports[&3];
    assert_eq!(report.unique_count, 1);
    assert_eq!(report.average_cluster_size, 3.0);
    assert_eq!(report.average_distance, 0.0);
    assert_eq!(report.distance_std_dev, 0.0);
}

#[test]
fn interleaving_order_distinguishes_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Same (thread, location) pairs, opposite temporal order.
    write_traces(dir.path(), &["0 L1\n1 L2\n", "1 L2\n0 L1\n"]);

    let reports = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[2],
        DistanceAlgorithm::Levenshtein,
    )
    .expect("analyze");

    assert_eq!(reports[&2].unique_count, 2);
    assert!(reports[&2].average_distance > 0.0);
}

#[test]
fn multiple_cutoffs_report_prefixes_independently() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(
        dir.path(),
        &["0 A\n", "0 B\n", "0 A\n", "0 C\n", "0 A\n"],
    );

    let reports = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[1, 3, 5],
        DistanceAlgorithm::Levenshtein,
    )
    .expect("analyze");

    assert_eq!(reports[&1].unique_count, 1);
    assert_eq!(reports[&3].unique_count, 2);
    assert_eq!(reports[&5].unique_count, 3);

    // Cutoff keys iterate in ascending order.
    let order: Vec<usize> = reports.keys().copied().collect();
    assert_eq!(order, vec![1, 3, 5]);
}

#[test]
fn analysis_is_deterministic_across_repeats() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(
        dir.path(),
        &[
            "0 L1\n1 L2\n0 L3\n",
            "1 L2\n0 L1\n0 L3\n",
            "0 L1\n0 L3\n1 L2\n",
        ],
    );

    let config = EncodingConfig::new().with_unique_trace_locations();
    let traces = trace::read_trace_dir(dir.path()).expect("read traces");

    let (first, _) = encoding::encode_batch(&traces, &config).expect("encode");
    let (second, _) = encoding::encode_batch(&traces, &config).expect("encode");
    assert_eq!(first, second);

    let a = diversity::analyze(&first, &[3], DistanceAlgorithm::DamerauLevenshtein, true)
        .expect("analyze");
    let b = diversity::analyze(&second, &[3], DistanceAlgorithm::DamerauLevenshtein, true)
        .expect("analyze");
    // Pairwise evaluation is parallel, so compare with a tolerance.
    assert_eq!(a[&3].unique_count, b[&3].unique_count);
    assert!((a[&3].average_distance - b[&3].average_distance).abs() < 1e-9);
    assert!((a[&3].distance_std_dev - b[&3].distance_std_dev).abs() < 1e-9);
}

#[test]
fn oversized_cutoff_reports_insufficient_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n", "0 L1\n", "0 L1\n"]);

    let err = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[5],
        DistanceAlgorithm::Levenshtein,
    )
    .expect_err("only 3 runs on disk");

    assert!(matches!(
        err,
        AnalysisError::InsufficientData {
            cutoff: 5,
            available: 3
        }
    ));
}

#[test]
fn malformed_trace_file_rejects_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n", "garbage-line\n"]);

    let err = trace::read_trace_dir(dir.path()).expect_err("second file is malformed");
    match err {
        TraceError::MalformedLine { file, line, .. } => {
            assert_eq!(file, "run-001.txt");
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn hamming_works_when_all_runs_have_equal_length() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n0 L2\n", "0 L2\n0 L1\n", "0 L1\n0 L2\n"]);

    let reports = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[3],
        DistanceAlgorithm::Hamming,
    )
    .expect("equal-length batch");

    let report = &reports[&3];
    assert_eq!(report.unique_count, 2);
    assert!(report.average_distance > 0.0);
}

#[test]
fn hamming_fails_loudly_on_unequal_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n", "0 L1\n0 L2\n"]);

    let err = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[2],
        DistanceAlgorithm::Hamming,
    )
    .expect_err("length mismatch");

    assert!(matches!(err, AnalysisError::Distance(_)));
}

#[test]
fn similarity_metrics_report_in_their_own_direction() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n1 L2\n", "0 L1\n1 L2\n"]);

    let reports = analyze_dir(
        dir.path(),
        &EncodingConfig::new(),
        &[2],
        DistanceAlgorithm::Jaro,
    )
    .expect("analyze");

    // Identical runs: Jaro similarity is its identity value 1, not 0.
    assert_eq!(reports[&2].average_distance, 1.0);
    assert_eq!(reports[&2].distance_std_dev, 0.0);
}

#[test]
fn unique_locations_mode_distinguishes_repeat_visits() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_traces(dir.path(), &["0 L1\n0 L1\n"]);

    let traces = trace::read_trace_dir(dir.path()).expect("read traces");
    let config = EncodingConfig::new().with_unique_trace_locations();
    let (signatures, _) = encoding::encode_batch(&traces, &config).expect("encode");

    let chars: Vec<char> = signatures[0].chars().collect();
    assert_eq!(chars.len(), 4);
    assert_ne!(chars[1], chars[3], "repeat visit must get a fresh symbol");
}
