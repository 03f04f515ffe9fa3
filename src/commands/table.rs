//! Generic table commands: read, update and delete.

use anyhow::{bail, Result};
use memestore::config::OutputFormat;
use memestore::{Cell, Condition, Store, Table};

pub fn read(store: &Store, table: &str, format: OutputFormat) -> Result<()> {
    let table: Table = table.parse()?;
    let data = store.read_table(table)?;
    super::print_table(&data, format)
}

pub fn update(
    store: &Store,
    table: &str,
    assignments: &[String],
    condition: &str,
    format: OutputFormat,
) -> Result<()> {
    let table: Table = table.parse()?;
    let values = parse_assignments(assignments)?;
    let condition: Condition = condition.parse()?;

    let changed = store.update_rows(table, &values, &condition)?;
    print_count("updated", changed, table, format)
}

pub fn delete(store: &Store, table: &str, condition: &str, format: OutputFormat) -> Result<()> {
    let table: Table = table.parse()?;
    let condition: Condition = condition.parse()?;

    let deleted = store.delete_rows(table, &condition)?;
    print_count("deleted", deleted, table, format)
}

fn print_count(action: &str, count: usize, table: Table, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{count} row(s) {action} in {table}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "table": table.name(), action: count })
        ),
    }
    Ok(())
}

/// Parse `column=value` pairs; values follow [`Cell::parse_literal`].
fn parse_assignments(raw: &[String]) -> Result<Vec<(String, Cell)>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => {
                Ok((column.trim().to_string(), Cell::parse_literal(value)))
            }
            _ => bail!("invalid assignment {pair:?}, expected column=value"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let values = parse_assignments(&[
            "price_usd=0.5".to_string(),
            "name = Pepe Coin".to_string(),
            "blockchain_id=null".to_string(),
        ])
        .unwrap();

        assert_eq!(values[0], ("price_usd".to_string(), Cell::Real(0.5)));
        assert_eq!(values[1], ("name".to_string(), Cell::Text("Pepe Coin".to_string())));
        assert_eq!(values[2], ("blockchain_id".to_string(), Cell::Null));
    }

    #[test]
    fn test_parse_assignments_rejects_missing_column() {
        assert!(parse_assignments(&["=1".to_string()]).is_err());
        assert!(parse_assignments(&["price_usd".to_string()]).is_err());
    }
}
