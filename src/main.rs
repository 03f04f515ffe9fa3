//! memestore: manage blockchain ecosystems and their meme coins in SQLite.
//!
//! # Usage
//!
//! ```bash
//! memestore --db-path ./crypto_ruanas.sqlite upsert batch.json
//! memestore read MemeCoin
//! memestore update MemeCoin --set price_usd=0.000009 --where "coin_id = 'pepe'"
//! memestore delete MemeCoin --where "symbol = 'BONK'"
//! memestore --output json report
//! ```
//!
//! Environment variables can also be used:
//! - `MEMESTORE_DB_PATH`: SQLite database file
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//! - `MEMESTORE_LOG_FORMAT`: `text` or `json` log lines

mod commands;

use anyhow::Result;
use memestore::config::{Command, Config};
use memestore::observability::tracing::init_tracing;
use memestore::Store;

fn main() -> Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    init_tracing(&config.log_level, config.log_format);

    let store = Store::open(&config.db_path);
    tracing::debug!(path = %store.path().display(), "Using database");
    let format = config.output;

    match config.command {
        Command::Upsert { file } => commands::upsert::run(&store, &file, format),
        Command::Read { table } => commands::table::read(&store, &table, format),
        Command::Update {
            table,
            assignments,
            condition,
        } => commands::table::update(&store, &table, &assignments, &condition, format),
        Command::Delete { table, condition } => {
            commands::table::delete(&store, &table, &condition, format)
        }
        Command::Report => commands::report::run(&store, format),
        Command::Demo => commands::demo::run(&store, format),
    }
}
