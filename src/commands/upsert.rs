//! Upsert command implementation.

use anyhow::{Context, Result};
use memestore::config::OutputFormat;
use memestore::{Store, TokenRecord};
use std::fs;
use std::path::Path;

pub fn run(store: &Store, file: &Path, format: OutputFormat) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("failed to read batch file {}", file.display()))?;
    let records: Vec<TokenRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid batch file {}", file.display()))?;

    let outcome = store.upsert_batch(&records)?;

    match format {
        OutputFormat::Text => println!(
            "Processed {} record(s): {} written, {} dropped",
            outcome.submitted, outcome.written, outcome.dropped
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}
