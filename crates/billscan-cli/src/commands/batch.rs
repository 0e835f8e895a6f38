//! Batch command - ingest every bill in a folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use billscan_core::{BatchOrchestrator, BillscanConfig, PdfDocumentSource, ProcessingOutcome};

use crate::ledger::LedgerStore;

/// Orchestrator wired to the on-disk ledger and PDF documents.
pub type LedgerOrchestrator = BatchOrchestrator<LedgerStore, PdfDocumentSource>;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Folder containing the bills
    #[arg(required = true)]
    folder: PathBuf,

    /// File pattern inside the folder (default from config: "*.pdf")
    #[arg(short, long)]
    pattern: Option<String>,

    /// Ledger file that stores saved bills
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Output format for the run outcome
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutcomeFormat,

    /// Write failed documents to a CSV file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Exit with an error if any document failed
    #[arg(long)]
    fail_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutcomeFormat {
    /// Human-readable summary
    Text,
    /// JSON outcome
    Json,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let pattern = args
        .pattern
        .clone()
        .unwrap_or_else(|| config.batch.file_pattern.clone());
    let orchestrator = Arc::new(open_orchestrator(&config, args.ledger.as_deref())?);

    if matches!(args.format, OutcomeFormat::Text) {
        println!(
            "{} Processing {} in {}",
            style("ℹ").blue(),
            pattern,
            args.folder.display()
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Processing bills...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let cancel = CancellationToken::new();
    let result = run_cancellable(orchestrator, &args.folder, &pattern, cancel).await;
    pb.finish_and_clear();
    let outcome = result?;

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcome)?;
        if matches!(args.format, OutcomeFormat::Text) {
            println!(
                "{} Summary written to {}",
                style("✓").green(),
                summary_path.display()
            );
        }
    }

    match args.format {
        OutcomeFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutcomeFormat::Text => print_outcome(&outcome),
    }

    if args.fail_on_error && outcome.failed > 0 {
        anyhow::bail!("{} of {} documents failed", outcome.failed, outcome.files_found);
    }

    Ok(())
}

/// Open the ledger and build an orchestrator configured from `config`.
///
/// The ledger is `ledger` if given, else the configured path, else the default.
pub fn open_orchestrator(
    config: &BillscanConfig,
    ledger: Option<&Path>,
) -> anyhow::Result<LedgerOrchestrator> {
    let ledger_path = ledger
        .map(Path::to_path_buf)
        .or_else(|| config.batch.ledger_path.clone())
        .unwrap_or_else(super::default_ledger_path);

    let store = LedgerStore::open(&ledger_path)
        .with_context(|| format!("Failed to open ledger {}", ledger_path.display()))?;
    info!("Ledger {} holds {} bills", store.path().display(), store.len());

    Ok(BatchOrchestrator::new(store, PdfDocumentSource::from_config(&config.pdf)).with_config(config))
}

/// Run one batch on the blocking pool; Ctrl-C cancels it between documents.
pub async fn run_cancellable(
    orchestrator: Arc<LedgerOrchestrator>,
    folder: &Path,
    pattern: &str,
    cancel: CancellationToken,
) -> anyhow::Result<ProcessingOutcome> {
    let folder = folder.to_path_buf();
    let pattern = pattern.to_string();
    let token = cancel.clone();
    let mut handle = tokio::task::spawn_blocking(move || {
        orchestrator.process_with_cancel(&folder, &pattern, &token)
    });

    let outcome = tokio::select! {
        joined = &mut handle => joined?,
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupt received, cancelling batch");
            cancel.cancel();
            handle.await?
        }
    }?;

    Ok(outcome)
}

pub fn print_outcome(outcome: &ProcessingOutcome) {
    println!();
    let mark = if outcome.cancelled {
        style("!").yellow()
    } else {
        style("✓").green()
    };
    println!(
        "{} Found {} documents{}",
        mark,
        outcome.files_found,
        if outcome.cancelled { " (cancelled)" } else { "" }
    );
    println!(
        "   {} processed, {} skipped, {} failed",
        style(outcome.processed).green(),
        style(outcome.skipped).cyan(),
        style(outcome.failed).red()
    );

    if !outcome.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for message in outcome.messages() {
            println!("  - {}", message);
        }
    }
}

fn write_summary(path: &Path, outcome: &ProcessingOutcome) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "stage", "detail"])?;
    for failure in &outcome.failures {
        wtr.write_record([
            failure.file.as_str(),
            failure.stage.as_str(),
            failure.detail.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
