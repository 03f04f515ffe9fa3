//! Domain records for ecosystems, tokens and the joined report.

use serde::{Deserialize, Serialize};

/// A blockchain network tokens are issued on (row of `Blockchain`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ecosystem {
    pub id: String,
    pub name: String,
    pub native_symbol: Option<String>,
}

/// A stored meme coin (row of `MemeCoin`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub volume_24h: Option<f64>,
    /// Unix milliseconds of the last write.
    pub last_updated: Option<i64>,
    /// Cleared when the referenced ecosystem is deleted.
    pub ecosystem_id: Option<String>,
}

/// A candidate token submitted in an upsert batch.
///
/// Records whose `id` or `ecosystem_id` is absent (missing or blank) are
/// dropped before anything is written. Every field defaults when missing
/// from JSON input, so one incomplete row never rejects the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub market_cap_usd: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub ecosystem_id: Option<String>,
    #[serde(default)]
    pub ecosystem_name: String,
    /// Native symbol of the ecosystem, only used when the ecosystem is created.
    #[serde(default)]
    pub ecosystem_symbol: Option<String>,
}

impl TokenRecord {
    /// Create a record with the required fields and no metrics.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        ecosystem_id: impl Into<String>,
        ecosystem_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            symbol: symbol.into(),
            price_usd: None,
            market_cap_usd: None,
            volume_24h: None,
            ecosystem_id: Some(ecosystem_id.into()),
            ecosystem_name: ecosystem_name.into(),
            ecosystem_symbol: None,
        }
    }

    #[must_use]
    pub fn with_price(mut self, price_usd: f64) -> Self {
        self.price_usd = Some(price_usd);
        self
    }

    #[must_use]
    pub fn with_market_cap(mut self, market_cap_usd: f64) -> Self {
        self.market_cap_usd = Some(market_cap_usd);
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume_24h: f64) -> Self {
        self.volume_24h = Some(volume_24h);
        self
    }

    #[must_use]
    pub fn with_ecosystem_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.ecosystem_symbol = Some(symbol.into());
        self
    }

    /// The token key, if present and not blank.
    pub fn key(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    /// The ecosystem key, if present and not blank.
    pub fn ecosystem_key(&self) -> Option<&str> {
        non_blank(self.ecosystem_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Summary of an upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Records passed in.
    pub submitted: usize,
    /// Records written (inserted or refreshed).
    pub written: usize,
    /// Records dropped for a missing token or ecosystem key.
    pub dropped: usize,
}

/// One line of the joined token/ecosystem report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub symbol: String,
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub ecosystem_name: String,
    pub last_updated: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_are_absent() {
        let mut record = TokenRecord::new("pepe", "Pepe", "PEPE", "ethereum", "Ethereum");
        assert_eq!(record.key(), Some("pepe"));
        assert_eq!(record.ecosystem_key(), Some("ethereum"));

        record.id = Some("   ".to_string());
        record.ecosystem_id = None;
        assert_eq!(record.key(), None);
        assert_eq!(record.ecosystem_key(), None);
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "bonk",
            "name": "Bonk",
            "symbol": "BONK",
            "ecosystem_id": "solana",
            "ecosystem_name": "Solana"
        }"#;
        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key(), Some("bonk"));
        assert_eq!(record.price_usd, None);
        assert_eq!(record.market_cap_usd, None);
        assert_eq!(record.ecosystem_symbol, None);
    }

    #[test]
    fn test_batch_with_ecosystemless_row_still_parses() {
        let json = r#"[
            {"id": "x", "name": "X", "symbol": "X"},
            {"id": "wif", "name": "dogwifhat", "symbol": "WIF",
             "ecosystem_id": "solana", "ecosystem_name": "Solana"}
        ]"#;
        let records: Vec<TokenRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key(), Some("x"));
        assert_eq!(records[0].ecosystem_key(), None);
        assert_eq!(records[0].ecosystem_name, "");
        assert_eq!(records[1].ecosystem_key(), Some("solana"));
    }
}
