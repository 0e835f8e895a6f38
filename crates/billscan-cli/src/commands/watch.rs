//! Watch command - re-run the batch for a folder on a fixed interval.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use billscan_core::BillError;

use super::batch::{open_orchestrator, print_outcome, LedgerOrchestrator};

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Folder containing the bills
    #[arg(required = true)]
    folder: PathBuf,

    /// Seconds between runs
    #[arg(short, long, default_value = "300")]
    interval: u64,

    /// File pattern inside the folder (default from config: "*.pdf")
    #[arg(short, long)]
    pattern: Option<String>,

    /// Ledger file that stores saved bills
    #[arg(short, long)]
    ledger: Option<PathBuf>,
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if args.interval == 0 {
        anyhow::bail!("Interval must be at least one second");
    }

    let config = super::load_config(config_path)?;
    let pattern = args
        .pattern
        .clone()
        .unwrap_or_else(|| config.batch.file_pattern.clone());
    let orchestrator = Arc::new(open_orchestrator(&config, args.ledger.as_deref())?);

    println!(
        "{} Watching {} every {}s (Ctrl-C to stop)",
        style("ℹ").blue(),
        args.folder.display(),
        args.interval
    );

    let cancel = CancellationToken::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut runs = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                runs.spawn(trigger(
                    orchestrator.clone(),
                    args.folder.clone(),
                    pattern.clone(),
                    cancel.clone(),
                ));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, stopping watch");
                cancel.cancel();
                break;
            }
            Some(joined) = runs.join_next(), if !runs.is_empty() => {
                joined?;
            }
        }
    }

    while let Some(joined) = runs.join_next().await {
        joined?;
    }

    println!("{} Stopped watching", style("✓").green());
    Ok(())
}

/// One scheduled run; a run still in progress turns the trigger into a skip.
async fn trigger(
    orchestrator: Arc<LedgerOrchestrator>,
    folder: PathBuf,
    pattern: String,
    cancel: CancellationToken,
) {
    let result =
        tokio::task::spawn_blocking(move || orchestrator.process_with_cancel(&folder, &pattern, &cancel))
            .await;

    match result {
        Ok(Ok(outcome)) => print_outcome(&outcome),
        Ok(Err(BillError::RunInProgress)) => {
            println!(
                "{} Previous run still in progress, skipping this trigger",
                style("ℹ").blue()
            );
        }
        Ok(Err(e)) => warn!("Batch run failed: {}", e),
        Err(e) => warn!("Batch task failed: {}", e),
    }
}
