//! `crawl`: breadth-first venue crawler.
//!
//! Resolves the start venue, expands the "next venues" graph round by round
//! and writes checkpoints as CSV. Transient API failures are retried once
//! the operator confirms on the terminal; a failed round stops the crawl
//! and the last complete round is written.

use std::path::PathBuf;

use clap::Parser;

use crawl_cli::{CsvSnapshotWriter, ExitStatus, HttpSource, StdinPrompt};
use crawl_core::config::{CheckpointCadence, CliOverrides, GatePolicy};
use crawl_core::traits::{Cancellable, NodeSource};
use crawl_core::tracing::{init_tracing, init_tracing_with_filter};
use crawl_core::{CrawlConfig, CrawlErrorCode, NodeId};
use crawl_engine::{CheckpointWriter, EngineSettings, FrontierEngine};

#[derive(Parser)]
#[command(name = "crawl")]
#[command(version)]
#[command(about = "Breadth-first crawler over a venue adjacency API")]
struct Cli {
    /// Config file (replaces ./crawl.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start venue id
    #[arg(long)]
    start: Option<String>,

    /// Output root directory
    #[arg(long)]
    out: Option<String>,

    /// Maximum concurrent lookups per round
    #[arg(long)]
    concurrency: Option<usize>,

    /// Stop after this many rounds
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Confirmation gate scope: per_round or whole_traversal
    #[arg(long)]
    gate_policy: Option<GatePolicy>,

    /// Attempts per lookup, including the first
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Checkpoint cadence: power_of_two or every_round
    #[arg(long)]
    cadence: Option<CheckpointCadence>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            concurrency: self.concurrency,
            max_iterations: self.max_iterations,
            gate_policy: self.gate_policy,
            max_attempts: self.max_attempts,
            start_node_id: self.start.clone(),
            output_dir: self.out.clone(),
            cadence: self.cadence,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.verbose {
        0 => init_tracing(),
        1 => init_tracing_with_filter("crawl=debug"),
        _ => init_tracing_with_filter("crawl=trace"),
    }

    let status = run(cli).await;
    std::process::exit(status.code());
}

async fn run(cli: Cli) -> ExitStatus {
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match CrawlConfig::load(&root, cli.config.as_deref(), Some(&cli.overrides())) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e.tagged(), "cannot load configuration");
            return ExitStatus::Setup;
        }
    };

    let source = match HttpSource::new(&config.source) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e.tagged(), "cannot create HTTP source");
            return ExitStatus::Setup;
        }
    };

    let start_id = NodeId::new(config.source.effective_start_node_id());
    let start = match source.lookup_node(&start_id).await {
        Ok(start) => start,
        Err(e) => {
            tracing::error!(error = %e.tagged(), "cannot resolve start venue");
            return ExitStatus::Setup;
        }
    };
    tracing::info!(start = %start.id, label = %start.label, "starting traversal");

    let sink = match CsvSnapshotWriter::create(&config.output.effective_dir(), &start.label) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e.tagged(), "cannot create output directory");
            return ExitStatus::Setup;
        }
    };
    let mut writer = CheckpointWriter::new(sink, config.output.effective_cadence());

    let mut engine = FrontierEngine::new(
        source,
        StdinPrompt::new(),
        start,
        EngineSettings::from_config(&config),
    );

    let token = engine.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; stopping after the current round");
            token.cancel();
        }
    });

    let report = engine
        .run(|state| {
            writer.observe(state)?;
            Ok(())
        })
        .await;
    interrupt.abort();

    if let Err(e) = writer.finish(&report.final_state) {
        tracing::error!(error = %e.tagged(), "cannot write final snapshot");
        return ExitStatus::Partial;
    }

    tracing::info!(
        iteration = report.final_state.iteration,
        request_count = report.final_state.request_count,
        venues = report.final_state.node_count(),
        edges = report.final_state.edge_count(),
        run_dir = %writer.sink().run_dir().display(),
        "crawl finished"
    );
    ExitStatus::from(&report.stop_reason)
}
