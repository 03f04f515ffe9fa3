//! Test utilities shared by the integration tests.
//!
//! Provides:
//! - A temporary database fixture
//! - Sample batches from the ecosystem/token walkthrough

#![allow(dead_code)]

use memestore::observability::tracing::init_test_tracing;
use memestore::{Store, TokenRecord};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture that owns a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
    pub store: Store,
}

impl TestFixture {
    /// Create a new fixture with an initialized store.
    pub fn new() -> Self {
        init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let store = Store::try_open(&db_path).expect("failed to open store");
        Self {
            temp_dir,
            db_path,
            store,
        }
    }

    /// Get the database path as a string.
    pub fn db_path_str(&self) -> &str {
        self.db_path.to_str().expect("invalid path")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn pepe() -> TokenRecord {
    TokenRecord::new("pepe", "Pepe", "PEPE", "ethereum", "Ethereum")
        .with_price(0.000007)
        .with_market_cap(3e9)
}

pub fn bonk() -> TokenRecord {
    TokenRecord::new("bonk", "Bonk", "BONK", "solana", "Solana")
        .with_price(0.00002)
        .with_market_cap(1.2e9)
}

pub fn shiba() -> TokenRecord {
    TokenRecord::new("shiba-inu", "Shiba Inu", "SHIB", "ethereum", "Ethereum")
        .with_price(0.000025)
        .with_market_cap(15e9)
        .with_volume(1e9)
}

/// Sleep long enough for the millisecond clock to advance.
pub fn tick() {
    std::thread::sleep(std::time::Duration::from_millis(5));
}
