//! The `Store` facade over the SQLite file.
//!
//! Every operation opens its own connection, applies the pragmas and drops
//! the connection before returning, on success and error paths alike.
//! Failures are logged where they happen and returned as [`StoreError`].

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::batch::PreparedBatch;
use super::cell::{Cell, TableData};
use super::condition::Condition;
use super::error::StoreError;
use super::schema::{apply_pragmas, initialize_schema};
use super::table::{quote_ident, Table};
use crate::model::{BatchOutcome, Ecosystem, ReportRow, Token, TokenRecord};
use crate::now_millis;

/// Insert an ecosystem; an existing row keeps its name and symbol.
const INSERT_BLOCKCHAIN: &str = r#"
    INSERT INTO Blockchain (blockchain_id, name, native_symbol)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(blockchain_id) DO NOTHING
"#;

/// Insert a token; an existing row has its metrics, ecosystem and
/// timestamp refreshed but keeps its name and symbol.
const UPSERT_MEMECOIN: &str = r#"
    INSERT INTO MemeCoin (
        coin_id, name, symbol, price_usd, market_cap_usd,
        volume_24h, blockchain_id, last_updated
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(coin_id) DO UPDATE SET
        price_usd = excluded.price_usd,
        market_cap_usd = excluded.market_cap_usd,
        volume_24h = excluded.volume_24h,
        blockchain_id = excluded.blockchain_id,
        last_updated = excluded.last_updated
"#;

const JOINED_REPORT: &str = r#"
    SELECT
        m.name,
        m.symbol,
        m.price_usd,
        m.market_cap_usd,
        b.name,
        m.last_updated
    FROM MemeCoin m
    JOIN Blockchain b ON m.blockchain_id = b.blockchain_id
    ORDER BY m.market_cap_usd DESC
"#;

/// Handle to the ecosystem/token database file.
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Open the store at `db_path`, creating the file and schema if absent.
    ///
    /// Never fails: a setup error is logged and the handle is returned
    /// anyway, so an unusable file surfaces as an error from the first
    /// operation instead. Use [`Store::try_open`] to observe setup errors.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Self {
        let db_path = db_path.as_ref().to_path_buf();
        match Self::try_open(&db_path) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(
                    path = %db_path.display(),
                    kind = ?e.kind(),
                    error = %e,
                    "Failed to set up database"
                );
                Self { db_path }
            }
        }
    }

    /// Open the store, returning any setup error.
    pub fn try_open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        initialize_schema(&conn)?;
        tracing::info!(path = %store.db_path.display(), "Tables Blockchain and MemeCoin ensured");
        Ok(store)
    }

    /// Path of the database file this handle connects to.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path).map_err(|source| StoreError::Open {
            path: self.db_path.clone(),
            source,
        })?;
        apply_pragmas(&conn).map_err(|source| StoreError::Open {
            path: self.db_path.clone(),
            source,
        })?;
        Ok(conn)
    }

    /// Upsert a batch of token records.
    ///
    /// Records missing a token or ecosystem key are dropped. The rest are
    /// written in input order inside a single transaction: each record first
    /// inserts its ecosystem (kept unchanged if it exists), then inserts or
    /// refreshes its token. Any failure rolls back the whole batch.
    ///
    /// A batch in which every record was dropped is not written at all.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the database cannot be opened or a
    /// statement fails (for example a constraint violation). Nothing from the
    /// batch is kept in that case.
    #[tracing::instrument(skip(self, records), fields(submitted = records.len()))]
    pub fn upsert_batch(&self, records: &[TokenRecord]) -> Result<BatchOutcome, StoreError> {
        let batch = PreparedBatch::new(records);
        if batch.dropped() > 0 {
            tracing::warn!(
                dropped = batch.dropped(),
                "Dropping records without a token or ecosystem key"
            );
        }

        let outcome = BatchOutcome {
            submitted: batch.submitted(),
            written: batch.accepted().len(),
            dropped: batch.dropped(),
        };

        if batch.is_empty() {
            tracing::debug!("Nothing to write, skipping transaction");
            return Ok(outcome);
        }

        self.write_batch(&batch)
            .inspect_err(|e| tracing::error!(kind = ?e.kind(), error = %e, "Upsert batch rolled back"))?;

        tracing::info!(
            written = outcome.written,
            dropped = outcome.dropped,
            "Processed upsert batch"
        );
        Ok(outcome)
    }

    fn write_batch(&self, batch: &PreparedBatch<'_>) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        // Dropping an uncommitted transaction rolls it back.
        let tx = conn.transaction()?;
        {
            let mut insert_blockchain = tx.prepare_cached(INSERT_BLOCKCHAIN)?;
            let mut upsert_memecoin = tx.prepare_cached(UPSERT_MEMECOIN)?;

            for record in batch.accepted() {
                let ecosystem_id = record.ecosystem_key();
                insert_blockchain.execute(params![
                    ecosystem_id,
                    record.ecosystem_name,
                    record.ecosystem_symbol,
                ])?;
                upsert_memecoin.execute(params![
                    record.key(),
                    record.name,
                    record.symbol,
                    record.price_usd,
                    record.market_cap_usd,
                    record.volume_24h,
                    ecosystem_id,
                    now_millis(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Read every row of `table` in the backend's scan order.
    #[tracing::instrument(skip(self))]
    pub fn read_table(&self, table: Table) -> Result<TableData, StoreError> {
        let result = self.query_table(table);
        match &result {
            Ok(data) => tracing::debug!(rows = data.len(), "Read table"),
            Err(e) => tracing::error!(kind = ?e.kind(), error = %e, "Failed to read table"),
        }
        result
    }

    fn query_table(&self, table: Table) -> Result<TableData, StoreError> {
        let conn = self.connect()?;
        let columns = table
            .columns()
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM {}",
            quote_ident(table.name())
        ))?;

        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Cell::from))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TableData {
            columns: table.columns().iter().map(|c| (*c).to_string()).collect(),
            rows,
        })
    }

    /// Set `values` on every row of `table` matching `condition`.
    ///
    /// # Arguments
    ///
    /// * `table` - Table to update
    /// * `values` - Column/value pairs to assign, at least one
    /// * `condition` - Rows to change
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for empty `values`,
    /// [`StoreError::UnknownColumn`] when a column is not part of `table`
    /// (checked before the database is touched), and a constraint error when
    /// the new values break a foreign key.
    #[tracing::instrument(skip(self, values), fields(%condition))]
    pub fn update_rows(
        &self,
        table: Table,
        values: &[(String, Cell)],
        condition: &Condition,
    ) -> Result<usize, StoreError> {
        let result = self.execute_update(table, values, condition);
        match &result {
            Ok(changed) => tracing::info!(changed, "Updated rows"),
            Err(e) => tracing::error!(kind = ?e.kind(), error = %e, "Failed to update rows"),
        }
        result
    }

    fn execute_update(
        &self,
        table: Table,
        values: &[(String, Cell)],
        condition: &Condition,
    ) -> Result<usize, StoreError> {
        if values.is_empty() {
            return Err(StoreError::InvalidInput(
                "at least one column value is required".into(),
            ));
        }

        let mut params = Vec::with_capacity(values.len());
        let mut assignments = Vec::with_capacity(values.len());
        for (column, value) in values {
            assignments.push(format!("{} = ?", quote_ident(table.column(column)?)));
            params.push(value.clone());
        }
        let filter = condition.to_sql(table, &mut params)?;

        let sql = format!(
            "UPDATE {} SET {} WHERE {filter}",
            quote_ident(table.name()),
            assignments.join(", ")
        );

        let conn = self.connect()?;
        Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
    }

    /// Delete every row of `table` matching `condition`.
    ///
    /// Deleting an ecosystem clears the reference on its tokens instead of
    /// deleting them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownColumn`] if `condition` names a column
    /// outside `table`, or a database error.
    #[tracing::instrument(skip(self), fields(%condition))]
    pub fn delete_rows(&self, table: Table, condition: &Condition) -> Result<usize, StoreError> {
        let result = self.execute_delete(table, condition);
        match &result {
            Ok(deleted) => tracing::info!(deleted, "Deleted rows"),
            Err(e) => tracing::error!(kind = ?e.kind(), error = %e, "Failed to delete rows"),
        }
        result
    }

    fn execute_delete(&self, table: Table, condition: &Condition) -> Result<usize, StoreError> {
        let mut params = Vec::new();
        let filter = condition.to_sql(table, &mut params)?;
        let sql = format!("DELETE FROM {} WHERE {filter}", quote_ident(table.name()));

        let conn = self.connect()?;
        Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
    }

    /// Tokens joined with their ecosystem name, highest market cap first.
    ///
    /// Tokens without an ecosystem are left out.
    pub fn joined_report(&self) -> Result<Vec<ReportRow>, StoreError> {
        let result = self.query_report();
        if let Err(e) = &result {
            tracing::error!(kind = ?e.kind(), error = %e, "Failed to build report");
        }
        result
    }

    fn query_report(&self) -> Result<Vec<ReportRow>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(JOINED_REPORT)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ReportRow {
                    name: row.get(0)?,
                    symbol: row.get(1)?,
                    price_usd: row.get(2)?,
                    market_cap_usd: row.get(3)?,
                    ecosystem_name: row.get(4)?,
                    last_updated: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Look up a single token by key.
    pub fn token(&self, id: &str) -> Result<Option<Token>, StoreError> {
        let conn = self.connect()?;
        let token = conn
            .query_row(
                "SELECT coin_id, name, symbol, price_usd, market_cap_usd, volume_24h,
                        last_updated, blockchain_id
                 FROM MemeCoin WHERE coin_id = ?1",
                [id],
                |row| {
                    Ok(Token {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        symbol: row.get(2)?,
                        price_usd: row.get(3)?,
                        market_cap_usd: row.get(4)?,
                        volume_24h: row.get(5)?,
                        last_updated: row.get(6)?,
                        ecosystem_id: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(token)
    }

    /// Look up a single ecosystem by key.
    pub fn ecosystem(&self, id: &str) -> Result<Option<Ecosystem>, StoreError> {
        let conn = self.connect()?;
        let ecosystem = conn
            .query_row(
                "SELECT blockchain_id, name, native_symbol FROM Blockchain WHERE blockchain_id = ?1",
                [id],
                |row| {
                    Ok(Ecosystem {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        native_symbol: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(ecosystem)
    }
}
