//! Line-format adapter for raw trace files.
//!
//! The instrumented target program writes one trace file per run into a
//! trace directory. Each line carries `<threadId> <locationId>` as its
//! first two whitespace-separated tokens; trailing fields are ignored.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::TraceError;

use super::{RawTrace, TraceEvent};

/// Parses one trace from already-read file content.
///
/// Blank lines are skipped. Any other line that does not yield an integer
/// thread id and a location id rejects the whole trace with
/// [`TraceError::MalformedLine`], identifying the source and line number.
///
/// # Arguments
///
/// * `source` - Label for the trace, used in error reporting.
/// * `content` - Newline-delimited trace text.
pub fn parse_trace(source: &str, content: &str) -> Result<RawTrace, TraceError> {
    let mut events = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let event = match (fields.next(), fields.next()) {
            (Some(thread), Some(location)) => thread.parse::<i64>().ok().map(|thread_id| {
                TraceEvent {
                    thread_id,
                    location_id: location.to_string(),
                }
            }),
            _ => None,
        };

        match event {
            Some(event) => events.push(event),
            None => {
                return Err(TraceError::MalformedLine {
                    file: source.to_string(),
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        }
    }

    Ok(RawTrace::new(source, events))
}

/// Reads and parses a single trace file.
pub fn read_trace_file(path: &Path) -> Result<RawTrace, TraceError> {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let content = fs::read_to_string(path)?;
    parse_trace(&source, &content)
}

/// Reads all trace files in a directory, one trace per file.
///
/// Files are visited in sorted file-name order so that repeated analyses
/// of the same directory see the same run order. Instrumented programs
/// name trace files by run index, so sorted order is run order.
///
/// # Errors
///
/// Returns [`TraceError::DirectoryNotFound`] if `dir` is not a directory
/// and [`TraceError::NoTraces`] if it contains no files.
pub fn read_trace_dir(dir: &Path) -> Result<Vec<RawTrace>, TraceError> {
    if !dir.is_dir() {
        return Err(TraceError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(TraceError::NoTraces(dir.to_path_buf()));
    }

    debug!(count = paths.len(), dir = %dir.display(), "reading trace files");

    paths.iter().map(|path| read_trace_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn parses_thread_and_location() {
        let trace = parse_trace("run-0", "0 L1\n1 L2\n").expect("should parse");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.events[0].thread_id, 0);
        assert_eq!(trace.events[0].location_id, "L1");
        assert_eq!(trace.events[1].thread_id, 1);
        assert_eq!(trace.events[1].location_id, "L2");
    }

    #[test]
    fn ignores_trailing_fields_and_blank_lines() {
        let trace = parse_trace("run-0", "0 L1 extra stuff here\n\n  \n12 L9 3\n").expect("should parse");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.events[1].thread_id, 12);
        assert_eq!(trace.events[1].location_id, "L9");
    }

    #[test]
    fn rejects_malformed_thread_id() {
        let err = parse_trace("run-3", "0 L1\nnope L2\n").expect_err("should fail");
        match err {
            TraceError::MalformedLine { file, line, content } => {
                assert_eq!(file, "run-3");
                assert_eq!(line, 2);
                assert!(content.contains("nope"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_location() {
        let err = parse_trace("run-0", "42\n").expect_err("should fail");
        assert!(matches!(err, TraceError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn negative_thread_ids_parse() {
        let trace = parse_trace("run-0", "-1 L1\n").expect("should parse");
        assert_eq!(trace.events[0].thread_id, -1);
    }

    #[test]
    fn reads_directory_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("run-2.txt"), "0 L2\n").expect("write");
        fs::write(dir.path().join("run-0.txt"), "0 L0\n").expect("write");
        fs::write(dir.path().join("run-1.txt"), "0 L1\n").expect("write");

        let traces = read_trace_dir(dir.path()).expect("should read");
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].events[0].location_id, "L0");
        assert_eq!(traces[1].events[0].location_id, "L1");
        assert_eq!(traces[2].events[0].location_id, "L2");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent");
        assert!(matches!(
            read_trace_dir(&missing),
            Err(TraceError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            read_trace_dir(dir.path()),
            Err(TraceError::NoTraces(_))
        ));
    }
}
