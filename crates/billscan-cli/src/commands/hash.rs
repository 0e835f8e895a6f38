//! Hash command - print content fingerprints.

use std::path::PathBuf;

use clap::Args;

use billscan_core::compute_hash;

/// Arguments for the hash command.
#[derive(Args)]
pub struct HashArgs {
    /// Files to fingerprint
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

pub async fn run(args: HashArgs) -> anyhow::Result<()> {
    for path in &args.files {
        let fingerprint = compute_hash(path)?;
        println!("{}  {}", fingerprint, path.display());
    }
    Ok(())
}
