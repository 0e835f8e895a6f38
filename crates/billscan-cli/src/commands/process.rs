//! Process command - extract data from a single bill without saving it.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use billscan_core::bill::rules::format_decimal_comma;
use billscan_core::{
    BatchOrchestrator, BillRecord, Disposition, Fingerprint, MemoryStore, PdfDocumentSource,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF bill
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    info!("Processing file: {}", args.input.display());

    // An empty in-memory store always lets the document through the gate.
    let orchestrator =
        BatchOrchestrator::new(MemoryStore::new(), PdfDocumentSource::from_config(&config.pdf))
            .with_config(&config);
    let fingerprint = match orchestrator.process_document(&args.input)? {
        Disposition::Processed(fingerprint) | Disposition::Skipped(fingerprint) => fingerprint,
    };
    let stored = orchestrator
        .store()
        .get(fingerprint.as_str())
        .ok_or_else(|| anyhow::anyhow!("No record extracted from {}", args.input.display()))?;
    let record = stored.record;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Text => format_record_text(&record, &fingerprint),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_record_text(record: &BillRecord, fingerprint: &Fingerprint) -> String {
    let consumption = record.consumption();
    let financial = record.financial();
    let mut output = String::new();

    output.push_str(&format!("Period: {}\n", record.period()));
    output.push_str(&format!("Month:  {} {}\n", record.month(), record.year()));
    if record.is_offered_period() {
        output.push_str("Offered period: yes\n");
    }
    output.push('\n');

    output.push_str("Consumption:\n");
    output.push_str(&format!("  Units:          {} kWh\n", consumption.total_units()));
    output.push_str(&format!("  Base price:     {}\n", consumption.base_price()));
    output.push_str(&format!("  Discount:       {}\n", consumption.discount_value()));
    output.push_str(&format!("  After discount: {}\n", consumption.price_after_discount()));
    output.push('\n');

    output.push_str("Financial:\n");
    output.push_str(&format!("  Energy: {} €\n", format_decimal_comma(financial.energy_value)));
    output.push_str(&format!("  Taxes:  {} €\n", format_decimal_comma(financial.taxes_and_fees)));
    output.push_str(&format!("  Total:  {} €\n", format_decimal_comma(financial.total_amount)));
    output.push('\n');

    output.push_str(&format!("Fingerprint: {}\n", fingerprint));
    output
}
