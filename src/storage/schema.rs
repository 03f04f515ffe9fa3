//! Schema initialization and connection pragmas.

use rusqlite::Connection;
use std::time::Duration;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_BLOCKCHAIN: &str = r#"
    CREATE TABLE IF NOT EXISTS Blockchain (
        blockchain_id TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        native_symbol TEXT
    )
"#;

const CREATE_MEMECOIN: &str = r#"
    CREATE TABLE IF NOT EXISTS MemeCoin (
        coin_id        TEXT PRIMARY KEY,
        name           TEXT NOT NULL,
        symbol         TEXT NOT NULL,
        price_usd      REAL,
        market_cap_usd REAL,
        volume_24h     REAL,
        last_updated   INTEGER,
        blockchain_id  TEXT,
        CONSTRAINT fk_blockchain
            FOREIGN KEY (blockchain_id)
            REFERENCES Blockchain (blockchain_id)
            ON DELETE SET NULL
    )
"#;

/// Apply per-connection pragmas.
///
/// Foreign keys are off by default in SQLite and must be enabled on every
/// connection.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Create both tables if they do not exist.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!("BEGIN; {CREATE_BLOCKCHAIN}; {CREATE_MEMECOIN}; COMMIT;"))
}
