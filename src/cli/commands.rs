//! CLI command definitions for interleave-bench.
//!
//! Three entry points around one analysis pipeline: `analyze` consumes an
//! existing trace directory, `run` executes the target program first, and
//! `sweep` repeats `run` once per variable-argument set and prints a
//! plot-ready block per set.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::distance::DistanceAlgorithm;
use crate::diversity;
use crate::encoding::{self, EncodingConfig};
use crate::report;
use crate::runner::{ProgramRunner, RunnerConfig, DEFAULT_TRACE_DIR};
use crate::trace::{self, RawTrace};

/// Thread-interleaving diversity analyzer for concurrent programs.
#[derive(Parser)]
#[command(name = "interleave-bench")]
#[command(about = "Quantify how much a concurrent program's thread interleavings vary across runs")]
#[command(version)]
#[command(
    long_about = "interleave-bench runs an instrumented concurrent program repeatedly (or consumes \
an existing directory of raw trace files), encodes each run's (threadId, locationId) trace into a \
compact interleaving signature, and reports unique-interleaving counts, cluster sizes, and pairwise \
string-distance statistics at one or more run-count cutoffs.\n\nExample usage:\n  \
interleave-bench analyze ./trace_output --count 10,20 --distance-algorithm jaro\n  \
interleave-bench run --count 30 java account.Main"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Analyze an existing directory of raw trace files.
    Analyze(AnalyzeArgs),

    /// Run the target program repeatedly, then analyze the traces it wrote.
    Run(RunArgs),

    /// Run the program once per variable-argument set and print plot-ready blocks.
    Sweep(SweepArgs),
}

/// Analysis options shared by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AnalysisOpts {
    /// Run-count cutoffs to report on (comma separated). For `run` and
    /// `sweep`, the largest cutoff is the number of runs.
    #[arg(short, long, default_value = "30", value_delimiter = ',')]
    pub count: Vec<usize>,

    /// Distance algorithm: levenshtein, damerau-levenshtein, jaro,
    /// jaro-winkler, hamming (or a numeric code 0-4).
    #[arg(short = 'd', long, default_value = "levenshtein")]
    pub distance_algorithm: DistanceAlgorithm,

    /// Omit thread symbols from signature tokens.
    #[arg(long)]
    pub disable_thread_ids: bool,

    /// Assign distinct symbols to repeated visits of the same location by
    /// the same thread.
    #[arg(long)]
    pub unique_trace_locations: bool,

    /// Map thread ids in sorted numeric order instead of first-appearance
    /// order.
    #[arg(long)]
    pub unordered_thread_ids: bool,

    /// Skip pairwise distance computation (the report carries the
    /// placeholder value 1).
    #[arg(long)]
    pub disable_coverage: bool,

    /// Emit reports as JSON instead of plot-ready text.
    #[arg(short, long)]
    pub json: bool,
}

impl AnalysisOpts {
    fn encoding_config(&self) -> EncodingConfig {
        EncodingConfig {
            disable_thread_ids: self.disable_thread_ids,
            unordered_thread_mapping: self.unordered_thread_ids,
            unique_trace_locations: self.unique_trace_locations,
        }
    }

    fn runs(&self) -> anyhow::Result<usize> {
        self.count
            .iter()
            .copied()
            .max()
            .context("at least one cutoff is required")
    }
}

/// Arguments for `interleave-bench analyze`.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Directory containing one raw trace file per completed run.
    pub trace_dir: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisOpts,
}

/// Execution options shared by `run` and `sweep`.
#[derive(Parser, Debug, Clone)]
pub struct ExecutionOpts {
    /// Working directory for the program; the trace directory appears
    /// beneath it.
    #[arg(short = 'w', long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Name of the trace directory written by the instrumented program.
    #[arg(long, default_value = DEFAULT_TRACE_DIR)]
    pub trace_dir: String,

    /// Substrings to scan for in program stdout (comma separated);
    /// matching lines are counted.
    #[arg(long, value_delimiter = ',')]
    pub output_flags: Vec<String>,

    /// Per-run timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip interleaving analysis entirely (only run and time the program).
    #[arg(long)]
    pub disable_interleaving: bool,
}

/// Arguments for `interleave-bench run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Program to execute.
    pub program: String,

    /// Arguments passed to the program on every run.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    #[command(flatten)]
    pub execution: ExecutionOpts,

    #[command(flatten)]
    pub analysis: AnalysisOpts,
}

/// Arguments for `interleave-bench sweep`.
#[derive(Parser, Debug)]
pub struct SweepArgs {
    /// Program to execute.
    pub program: String,

    /// Arguments passed on every run, before the variable set
    /// (whitespace split).
    #[arg(long, default_value = "")]
    pub fixed_args: String,

    /// Variable argument sets, one sweep point each (semicolon
    /// separated, each whitespace split).
    #[arg(long, value_delimiter = ';', required = true)]
    pub vary: Vec<String>,

    #[command(flatten)]
    pub execution: ExecutionOpts,

    #[command(flatten)]
    pub analysis: AnalysisOpts,
}

/// Parses CLI arguments from the process command line.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses arguments and runs the selected command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Runs the selected command with already-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze(args) => cmd_analyze(args),
        Commands::Run(args) => cmd_run(args).await,
        Commands::Sweep(args) => cmd_sweep(args).await,
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let traces = trace::read_trace_dir(&args.trace_dir)?;
    info!(runs = traces.len(), dir = %args.trace_dir.display(), "loaded raw traces");
    let rendered = render_reports(&traces, &args.analysis)?;
    print!("{rendered}");
    Ok(())
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = runner_config(
        &args.program,
        args.args.clone(),
        &args.execution,
        &args.analysis,
    )?;
    let trace_path = config.trace_path();

    let summary = ProgramRunner::new(config).run_all().await?;
    print!("{}", report::render_summary(&summary));

    if !args.execution.disable_interleaving {
        let traces = trace::read_trace_dir(&trace_path)?;
        let rendered = render_reports(&traces, &args.analysis)?;
        print!("{rendered}");
    }
    Ok(())
}

async fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let fixed: Vec<String> = args.fixed_args.split_whitespace().map(String::from).collect();
    let mut runtime_blocks = Vec::new();
    let mut analysis_blocks = Vec::new();

    for vary in &args.vary {
        info!(vary = %vary, "sweep point");

        let mut run_args = fixed.clone();
        run_args.extend(vary.split_whitespace().map(String::from));

        let config = runner_config(&args.program, run_args, &args.execution, &args.analysis)?;
        let trace_path = config.trace_path();

        let summary = ProgramRunner::new(config).run_all().await?;
        runtime_blocks.push((vary.clone(), summary.average_runtime_ms()));

        if !args.execution.disable_interleaving {
            let traces = trace::read_trace_dir(&trace_path)?;
            analysis_blocks.push((vary.clone(), render_reports(&traces, &args.analysis)?));
        }
    }

    // pgfplots-style comment lines, one per sweep point.
    println!("Average runtime (ms):");
    for (vary, avg) in &runtime_blocks {
        println!("    % {vary}  -  {avg:.2}");
        println!();
    }

    for (vary, block) in &analysis_blocks {
        println!("% {vary}");
        print!("{block}");
        println!();
    }
    Ok(())
}

/// Encodes the batch and renders reports per the analysis options.
fn render_reports(traces: &[RawTrace], opts: &AnalysisOpts) -> anyhow::Result<String> {
    let encoding_config = opts.encoding_config();
    let (signatures, table) = encoding::encode_batch(traces, &encoding_config)?;
    debug!(
        signatures = signatures.len(),
        locations = table.location_count(),
        "encoded batch"
    );

    let reports = diversity::analyze(
        &signatures,
        &opts.count,
        opts.distance_algorithm,
        !opts.disable_coverage,
    )?;

    if opts.json {
        Ok(format!("{}\n", report::to_json(&reports)?))
    } else {
        Ok(report::render_analysis(&reports, opts.distance_algorithm))
    }
}

fn runner_config(
    program: &str,
    args: Vec<String>,
    execution: &ExecutionOpts,
    analysis: &AnalysisOpts,
) -> anyhow::Result<RunnerConfig> {
    let mut config = RunnerConfig::new(program, args, analysis.runs()?)
        .with_working_dir(execution.working_dir.clone())
        .with_trace_dir(execution.trace_dir.clone())
        .with_output_flags(execution.output_flags.clone());
    if let Some(seconds) = execution.timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(config)
}
