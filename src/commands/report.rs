//! Report command implementation.

use anyhow::Result;
use memestore::config::OutputFormat;
use memestore::Store;

pub fn run(store: &Store, format: OutputFormat) -> Result<()> {
    let rows = store.joined_report()?;
    super::print_report(&rows, format)
}
