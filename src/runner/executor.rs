//! Program execution loop.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::RunnerError;

use super::{RunnerConfig, RunSummary};

/// Runs the target program repeatedly and collects the batch summary.
pub struct ProgramRunner {
    config: RunnerConfig,
}

impl ProgramRunner {
    /// Creates a runner with the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Executes all configured runs sequentially.
    ///
    /// Runs are sequential and blocking by design: concurrent target
    /// executions would interleave their trace files. A non-zero exit
    /// is logged and counted but does not abort the batch; trace files of
    /// rejected runs surface later as parse errors if they are damaged.
    pub async fn run_all(&self) -> Result<RunSummary, RunnerError> {
        let trace_path = self.config.trace_path();
        if trace_path.is_dir() {
            debug!(dir = %trace_path.display(), "removing stale trace directory");
            std::fs::remove_dir_all(&trace_path)?;
        }

        info!(
            program = %self.config.program,
            runs = self.config.runs,
            "running target program"
        );

        let mut summary = RunSummary::default();

        for run in 0..self.config.runs {
            let start = Instant::now();
            let output = self.run_once(run).await?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;
            summary.runtimes_ms.push(elapsed_ms);

            if !output.status.success() {
                summary.failed_runs += 1;
                warn!(
                    run,
                    code = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "target program exited with failure"
                );
            }

            self.scan_flags(&output.stdout, &mut summary);
            debug!(run, elapsed_ms, "run complete");
        }

        Ok(summary)
    }

    async fn run_once(&self, run: usize) -> Result<std::process::Output, RunnerError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .current_dir(&self.config.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let spawn_error = |source| RunnerError::Spawn {
            command: self.config.program.clone(),
            source,
        };

        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, command.output())
                .await
                .map_err(|_| RunnerError::Timeout {
                    run,
                    seconds: timeout.as_secs(),
                })?
                .map_err(spawn_error),
            None => command.output().await.map_err(spawn_error),
        }
    }

    /// Counts stdout lines containing any configured flag, keyed by the
    /// full matching line (a line counts once even if several flags hit).
    fn scan_flags(&self, stdout: &[u8], summary: &mut RunSummary) {
        if self.config.output_flags.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy(stdout);
        for line in text.lines() {
            if self
                .config
                .output_flags
                .iter()
                .any(|flag| line.contains(flag))
            {
                *summary.flag_counts.entry(line.to_string()).or_insert(0) += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn runs_and_times_a_program() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunnerConfig::new("echo", vec!["hello".to_string()], 3)
            .with_working_dir(dir.path());

        let summary = ProgramRunner::new(config).run_all().await.expect("run");
        assert_eq!(summary.runtimes_ms.len(), 3);
        assert_eq!(summary.failed_runs, 0);
        assert!(summary.average_runtime_ms() >= 0.0);
    }

    #[tokio::test]
    async fn counts_flag_lines_across_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunnerConfig::new("echo", vec!["FLAG_RACE detected".to_string()], 2)
            .with_working_dir(dir.path())
            .with_output_flags(vec!["FLAG_RACE".to_string()]);

        let summary = ProgramRunner::new(config).run_all().await.expect("run");
        assert_eq!(summary.flag_counts.len(), 1);
        assert_eq!(summary.flag_counts["FLAG_RACE detected"], 2);
    }

    #[tokio::test]
    async fn nonzero_exit_is_counted_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunnerConfig::new("sh", vec!["-c".to_string(), "exit 3".to_string()], 2)
            .with_working_dir(dir.path());

        let summary = ProgramRunner::new(config).run_all().await.expect("run");
        assert_eq!(summary.failed_runs, 2);
        assert_eq!(summary.runtimes_ms.len(), 2);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunnerConfig::new("definitely-not-a-real-binary", Vec::new(), 1)
            .with_working_dir(dir.path());

        let err = ProgramRunner::new(config).run_all().await.expect_err("spawn");
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn stale_trace_directory_is_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let trace_dir = dir.path().join("trace_output");
        std::fs::create_dir(&trace_dir).expect("mkdir");
        std::fs::write(trace_dir.join("old.txt"), "0 L1\n").expect("write");

        let config = RunnerConfig::new("echo", vec!["hi".to_string()], 1)
            .with_working_dir(dir.path())
            .with_timeout(Duration::from_secs(30));

        ProgramRunner::new(config).run_all().await.expect("run");
        assert!(!trace_dir.exists());
    }
}
