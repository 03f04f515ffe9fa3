//! Demo walkthrough: upsert, re-price, report and delete.

use anyhow::Result;
use memestore::config::OutputFormat;
use memestore::{Condition, Store, Table, TokenRecord};

fn initial_batch() -> Vec<TokenRecord> {
    vec![
        TokenRecord::new("pepe", "Pepe", "PEPE", "ethereum", "Ethereum")
            .with_price(0.000007)
            .with_market_cap(3_000_000_000.0)
            .with_volume(500_000_000.0),
        TokenRecord::new("dogwifhat", "dogwifhat", "WIF", "solana", "Solana")
            .with_price(2.50)
            .with_market_cap(2_500_000_000.0)
            .with_volume(400_000_000.0),
        TokenRecord::new("bonk", "Bonk", "BONK", "solana", "Solana")
            .with_price(0.00002)
            .with_market_cap(1_200_000_000.0)
            .with_volume(200_000_000.0),
        TokenRecord::new("shiba-inu", "Shiba Inu", "SHIB", "ethereum", "Ethereum")
            .with_price(0.000025)
            .with_market_cap(15_000_000_000.0)
            .with_volume(1_000_000_000.0),
    ]
}

fn price_update() -> Vec<TokenRecord> {
    vec![
        TokenRecord::new("pepe", "Pepe", "PEPE", "ethereum", "Ethereum")
            .with_price(0.000009)
            .with_market_cap(3_100_000_000.0)
            .with_volume(600_000_000.0),
        TokenRecord::new("dogwifhat", "dogwifhat", "WIF", "solana", "Solana")
            .with_price(2.75)
            .with_market_cap(2_750_000_000.0)
            .with_volume(450_000_000.0),
    ]
}

fn section(title: &str, format: OutputFormat) {
    if format == OutputFormat::Text {
        println!("\n--- {title} ---");
    }
}

pub fn run(store: &Store, format: OutputFormat) -> Result<()> {
    section("1. Upserting meme coins", format);
    let outcome = store.upsert_batch(&initial_batch())?;
    tracing::info!(written = outcome.written, "Initial batch stored");

    section("2. MemeCoin table", format);
    super::print_table(&store.read_table(Table::MemeCoin)?, format)?;

    section("3. Blockchain table", format);
    super::print_table(&store.read_table(Table::Blockchain)?, format)?;

    section("4. Upserting updated prices", format);
    store.upsert_batch(&price_update())?;
    super::print_table(&store.read_table(Table::MemeCoin)?, format)?;

    section("5. Joined report", format);
    super::print_report(&store.joined_report()?, format)?;

    section("6. Deleting Bonk", format);
    let deleted = store.delete_rows(Table::MemeCoin, &Condition::eq("symbol", "BONK"))?;
    tracing::info!(deleted, "Removed Bonk");
    super::print_report(&store.joined_report()?, format)?;

    Ok(())
}
