//! Subcommand implementations and shared output rendering.

pub mod demo;
pub mod report;
pub mod table;
pub mod upsert;

use memestore::config::OutputFormat;
use memestore::{Cell, ReportRow, TableData};

/// Print rows as aligned text columns or as a JSON array.
pub fn print_table(data: &TableData, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered: Vec<Vec<String>> = data
                .rows
                .iter()
                .map(|row| row.iter().map(Cell::to_string).collect())
                .collect();
            print_text(&data.columns, &rendered);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data.to_json())?),
    }
    Ok(())
}

pub fn print_report(rows: &[ReportRow], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let header = [
                "Meme Coin",
                "Symbol",
                "Price (USD)",
                "Market Cap (USD)",
                "Ecosystem",
                "Last Updated",
            ]
            .map(String::from);
            let rendered: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.name.clone(),
                        row.symbol.clone(),
                        optional(row.price_usd),
                        optional(row.market_cap_usd),
                        row.ecosystem_name.clone(),
                        optional(row.last_updated),
                    ]
                })
                .collect();
            print_text(&header, &rendered);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_text(header: &[String], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("No rows found.");
        return;
    }

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(header));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.as_slice()));
    }
    println!();
    println!("Total: {} row(s)", rows.len());
}
