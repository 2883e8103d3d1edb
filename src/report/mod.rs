//! Plot-ready report rendering.
//!
//! Diversity results are printed as `(cutoff,value)` pair lists, one
//! labelled line per statistic, so downstream tabulation scripts can pick
//! lines by label and feed the pairs straight into pgfplots-style
//! coordinate blocks. A JSON rendering is available for machine
//! consumers.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::distance::DistanceAlgorithm;
use crate::diversity::DiversityReport;
use crate::runner::RunSummary;

/// Rounds to 4 decimal places and formats without trailing zeros,
/// matching the wire format downstream parsers expect.
fn format_value(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{rounded}")
}

/// Flattens a cutoff-to-count map into a `(cutoff,count)` pair list.
pub fn flatten_counts(map: &BTreeMap<usize, usize>) -> String {
    map.iter()
        .map(|(cutoff, count)| format!("({cutoff},{count})"))
        .collect()
}

/// Flattens a cutoff-to-value map into a `(cutoff,value)` pair list with
/// values rounded to 4 decimals.
pub fn flatten_values(map: &BTreeMap<usize, f64>) -> String {
    map.iter()
        .map(|(cutoff, value)| format!("({cutoff},{})", format_value(*value)))
        .collect()
}

/// Renders the diversity analysis block.
///
/// One line per statistic, pairs in ascending cutoff order:
///
/// ```text
///     Unique interleavings: (5,3)(10,7)
///     Average Levenshtein distance: (5,2.4)(10,3.1)
///     Levenshtein distance standard deviation: (5,0.8)(10,1.02)
///     Average Cluster Size: (5,1.6667)(10,1.4286)
/// ```
pub fn render_analysis(
    reports: &BTreeMap<usize, DiversityReport>,
    algorithm: DistanceAlgorithm,
) -> String {
    let unique: BTreeMap<usize, usize> = reports
        .iter()
        .map(|(&cutoff, report)| (cutoff, report.unique_count))
        .collect();
    let distances: BTreeMap<usize, f64> = reports
        .iter()
        .map(|(&cutoff, report)| (cutoff, report.average_distance))
        .collect();
    let deviations: BTreeMap<usize, f64> = reports
        .iter()
        .map(|(&cutoff, report)| (cutoff, report.distance_std_dev))
        .collect();
    let clusters: BTreeMap<usize, f64> = reports
        .iter()
        .map(|(&cutoff, report)| (cutoff, report.average_cluster_size))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "\tUnique interleavings: {}", flatten_counts(&unique));
    let _ = writeln!(
        out,
        "\tAverage {algorithm} distance: {}",
        flatten_values(&distances)
    );
    let _ = writeln!(
        out,
        "\t{algorithm} distance standard deviation: {}",
        flatten_values(&deviations)
    );
    let _ = writeln!(out, "\tAverage Cluster Size: {}", flatten_values(&clusters));
    out
}

/// Renders the run summary block: average runtime plus one line per
/// detected flag. The `flag_-_-<line>-_-_<count>` framing is the format
/// downstream sweep tooling splits on.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Results:");
    let _ = writeln!(
        out,
        "\tAverage runtime (ms): {}",
        format_value(summary.average_runtime_ms())
    );

    let mut flags: Vec<_> = summary.flag_counts.iter().collect();
    flags.sort();
    for (line, count) in flags {
        let _ = writeln!(out, "\tDetected flag_-_-{line}-_-_{count}");
    }
    out
}

/// Serializes the reports as pretty JSON, keyed by cutoff.
pub fn to_json(reports: &BTreeMap<usize, DiversityReport>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
