//! Memestore: a SQLite-backed store for blockchain ecosystems and meme coins.
//!
//! Two fixed tables are managed: `Blockchain` (ecosystems) and `MemeCoin`
//! (tokens issued on an ecosystem). Token batches are upserted with a
//! foreign-key relationship to their ecosystem, and a joined report ranks
//! tokens by market capitalization.
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`model`]: Ecosystem, token and report records
//! - [`observability`]: Tracing setup
//! - [`storage`]: SQLite persistence layer and the [`Store`] facade

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::error::StoreError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod config;
pub mod model;
pub mod observability;
pub mod storage;

pub use model::{BatchOutcome, Ecosystem, ReportRow, Token, TokenRecord};
pub use storage::{Cell, Condition, ErrorKind, Store, StoreError, Table, TableData};

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_millis() as i64
}
