//! The closed set of tables the store manages.

use std::fmt;
use std::str::FromStr;

use super::error::StoreError;

/// A table managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Ecosystems tokens are issued on.
    Blockchain,
    /// Tokens, each referencing at most one ecosystem.
    MemeCoin,
}

const BLOCKCHAIN_COLUMNS: &[&str] = &["blockchain_id", "name", "native_symbol"];

const MEMECOIN_COLUMNS: &[&str] = &[
    "coin_id",
    "name",
    "symbol",
    "price_usd",
    "market_cap_usd",
    "volume_24h",
    "last_updated",
    "blockchain_id",
];

impl Table {
    pub const ALL: [Table; 2] = [Table::Blockchain, Table::MemeCoin];

    /// SQL name of the table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blockchain => "Blockchain",
            Self::MemeCoin => "MemeCoin",
        }
    }

    /// Columns in declaration order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Blockchain => BLOCKCHAIN_COLUMNS,
            Self::MemeCoin => MEMECOIN_COLUMNS,
        }
    }

    /// Resolve a caller-supplied column name to its canonical spelling.
    ///
    /// Matching is ASCII case-insensitive, as in SQLite.
    pub fn column(self, name: &str) -> Result<&'static str, StoreError> {
        self.columns()
            .iter()
            .copied()
            .find(|column| column.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name(),
                column: name.to_string(),
            })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|table| table.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                tracing::warn!(table = s, "Rejecting unknown or empty table name");
                StoreError::UnknownTable(s.to_string())
            })
    }
}

/// Quote an identifier for interpolation into SQL.
///
/// Only ever called with names taken from [`Table::columns`] or
/// [`Table::name`].
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
