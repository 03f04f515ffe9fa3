//! Upsert batch behavior: conflict policy, dropped records, rollback.

mod common;

use common::{bonk, pepe, shiba, tick, TestFixture};
use memestore::{Cell, ErrorKind, Table, TokenRecord};

#[test]
fn test_upsert_creates_ecosystems_and_tokens() {
    let fixture = TestFixture::new();
    let outcome = fixture.store.upsert_batch(&[pepe(), bonk()]).unwrap();

    assert_eq!(outcome.submitted, 2);
    assert_eq!(outcome.written, 2);
    assert_eq!(outcome.dropped, 0);

    let chains = fixture.store.read_table(Table::Blockchain).unwrap();
    assert_eq!(chains.len(), 2);
    assert!(chains.find("blockchain_id", "ethereum").is_some());
    assert!(chains.find("blockchain_id", "solana").is_some());

    let token = fixture.store.token("pepe").unwrap().unwrap();
    assert_eq!(token.name, "Pepe");
    assert_eq!(token.symbol, "PEPE");
    assert_eq!(token.price_usd, Some(0.000007));
    assert_eq!(token.market_cap_usd, Some(3e9));
    assert_eq!(token.volume_24h, None);
    assert_eq!(token.ecosystem_id.as_deref(), Some("ethereum"));
    assert!(token.last_updated.is_some());
}

#[test]
fn test_shared_ecosystem_inserted_once() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe(), shiba()]).unwrap();

    let chains = fixture.store.read_table(Table::Blockchain).unwrap();
    assert_eq!(chains.len(), 1);
}

#[test]
fn test_repeated_upsert_only_moves_timestamp() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe(), bonk()]).unwrap();
    let before = fixture.store.token("pepe").unwrap().unwrap();

    tick();
    fixture.store.upsert_batch(&[pepe(), bonk()]).unwrap();
    let after = fixture.store.token("pepe").unwrap().unwrap();

    assert_eq!(after.price_usd, before.price_usd);
    assert_eq!(after.market_cap_usd, before.market_cap_usd);
    assert_eq!(after.volume_24h, before.volume_24h);
    assert_eq!(after.ecosystem_id, before.ecosystem_id);
    assert!(after.last_updated > before.last_updated);
}

#[test]
fn test_existing_ecosystem_name_is_kept() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe()]).unwrap();

    let renamed = TokenRecord::new("shiba-inu", "Shiba Inu", "SHIB", "ethereum", "Ether Mainnet");
    fixture.store.upsert_batch(&[renamed]).unwrap();

    let ecosystem = fixture.store.ecosystem("ethereum").unwrap().unwrap();
    assert_eq!(ecosystem.name, "Ethereum");
}

#[test]
fn test_conflict_keeps_name_and_symbol() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe()]).unwrap();

    let rebranded = TokenRecord::new("pepe", "Pepe 2.0", "PEPE2", "ethereum", "Ethereum")
        .with_price(0.00001);
    fixture.store.upsert_batch(&[rebranded]).unwrap();

    let token = fixture.store.token("pepe").unwrap().unwrap();
    assert_eq!(token.name, "Pepe");
    assert_eq!(token.symbol, "PEPE");
    assert_eq!(token.price_usd, Some(0.00001));
    // Metrics missing from the new record are overwritten with NULL.
    assert_eq!(token.market_cap_usd, None);
}

#[test]
fn test_upsert_moves_token_to_new_ecosystem() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe()]).unwrap();

    let bridged = TokenRecord::new("pepe", "Pepe", "PEPE", "solana", "Solana");
    fixture.store.upsert_batch(&[bridged]).unwrap();

    let token = fixture.store.token("pepe").unwrap().unwrap();
    assert_eq!(token.ecosystem_id.as_deref(), Some("solana"));
    assert!(fixture.store.ecosystem("solana").unwrap().is_some());
}

#[test]
fn test_reprice_touches_only_the_resubmitted_token() {
    let fixture = TestFixture::new();
    fixture.store.upsert_batch(&[pepe(), bonk()]).unwrap();
    let bonk_before = fixture.store.token("bonk").unwrap().unwrap();
    let pepe_before = fixture.store.token("pepe").unwrap().unwrap();

    tick();
    let repriced = pepe().with_price(0.000009).with_market_cap(3.1e9);
    fixture.store.upsert_batch(&[repriced]).unwrap();

    let coins = fixture.store.read_table(Table::MemeCoin).unwrap();
    assert_eq!(coins.len(), 2);

    let pepe_row = coins.find("coin_id", "pepe").unwrap();
    let price = coins.column_index("price_usd").unwrap();
    let cap = coins.column_index("market_cap_usd").unwrap();
    let stamp = coins.column_index("last_updated").unwrap();
    assert_eq!(pepe_row[price], Cell::Real(0.000009));
    assert_eq!(pepe_row[cap], Cell::Real(3.1e9));
    assert!(pepe_row[stamp].as_i64() > pepe_before.last_updated);

    let bonk_after = fixture.store.token("bonk").unwrap().unwrap();
    assert_eq!(bonk_after, bonk_before);
}

#[test]
fn test_records_without_keys_are_dropped() {
    let fixture = TestFixture::new();

    let mut no_id = shiba();
    no_id.id = None;
    let mut no_chain = TokenRecord::new("wif", "dogwifhat", "WIF", "solana", "Solana");
    no_chain.ecosystem_id = None;

    let outcome = fixture
        .store
        .upsert_batch(&[pepe(), no_id, bonk(), no_chain])
        .unwrap();

    assert_eq!(outcome.submitted, 4);
    assert_eq!(outcome.written, 2);
    assert_eq!(outcome.dropped, 2);
    assert_eq!(fixture.store.read_table(Table::MemeCoin).unwrap().len(), 2);
    assert!(fixture.store.token("wif").unwrap().is_none());
}

#[test]
fn test_one_missing_key_writes_batch_size_minus_one() {
    let fixture = TestFixture::new();
    let mut broken = bonk();
    broken.id = Some(String::new());

    let outcome = fixture.store.upsert_batch(&[pepe(), broken, shiba()]).unwrap();
    assert_eq!(outcome.written, 2);
    assert_eq!(fixture.store.read_table(Table::MemeCoin).unwrap().len(), 2);
}

#[test]
fn test_failure_rolls_back_whole_batch() {
    let fixture = TestFixture::new();

    // Make the third record fail after two have been written.
    let conn = rusqlite::Connection::open(&fixture.db_path).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_bonk BEFORE INSERT ON MemeCoin
         WHEN NEW.coin_id = 'bonk'
         BEGIN SELECT RAISE(ABORT, 'bonk rejected'); END;",
    )
    .unwrap();
    drop(conn);

    let err = fixture
        .store
        .upsert_batch(&[pepe(), shiba(), bonk()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Constraint);

    assert!(fixture.store.read_table(Table::MemeCoin).unwrap().is_empty());
    assert!(fixture.store.read_table(Table::Blockchain).unwrap().is_empty());
}

#[test]
fn test_empty_batch_is_a_no_op() {
    let fixture = TestFixture::new();
    let outcome = fixture.store.upsert_batch(&[]).unwrap();
    assert_eq!(outcome.written, 0);
    assert!(fixture.store.read_table(Table::Blockchain).unwrap().is_empty());
}
