//! SQLite-backed measurement store

use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{Local, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::{MeasurementStore, UpsertOutcome};
use crate::import::batch::BatchIds;
use crate::import::record::{IMPORT_USER, OPERATION_TYPE, Record, STATUS};

/// Measurement store over a SQLite database file
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open an existing database file and verify the connection.
    ///
    /// A missing file is a connection error, not an invitation to create
    /// one: the destination table is an external contract.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path);

        // The pipeline is fully sequential; one connection is all it gets
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        let store = Self::new(pool);
        store.ping().await?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to validate the connection
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Failed to ping database")?;
        Ok(())
    }
}

/// Table names are interpolated into statements as identifiers; reject
/// anything that could not name a table.
fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        bail!("invalid table name '{}'", table);
    }
    Ok(())
}

#[async_trait]
impl MeasurementStore for SqliteStore {
    async fn last_batch_ids(&self, table: &str) -> Result<Option<BatchIds>> {
        validate_table_name(table)?;

        let row = sqlx::query(&format!(
            "SELECT MAX(Transfer_Id) AS transfer_id, MAX(Transaction_Id) AS transaction_id FROM {}",
            table
        ))
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to read last batch ids from {}", table))?;

        let transfer_id: Option<i64> = row.try_get("transfer_id")?;
        let transaction_id: Option<i64> = row.try_get("transaction_id")?;

        Ok(match (transfer_id, transaction_id) {
            (None, None) => None,
            (transfer_id, transaction_id) => Some(BatchIds {
                transfer_id: transfer_id.unwrap_or(0),
                transaction_id: transaction_id.unwrap_or(0),
            }),
        })
    }

    async fn upsert_by_key(&self, table: &str, record: &Record) -> Result<UpsertOutcome> {
        validate_table_name(table)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start merge transaction")?;

        // A matched key gets a new Num_Value and nothing else
        let updated = sqlx::query(&format!(
            "UPDATE {} SET Num_Value = ? WHERE Orig_TS_Local = ? AND Tag_Name = ?",
            table
        ))
        .bind(record.num_value)
        .bind(record.orig_ts_local)
        .bind(&record.tag_name)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to merge tag '{}' into {}", record.tag_name, table))?;

        let outcome = if updated.rows_affected() > 0 {
            UpsertOutcome::Updated
        } else {
            sqlx::query(&format!(
                "INSERT INTO {} (Orig_TS_UTC, Orig_TS_Local, Last_Op_TS_UTC, Last_Op_TS_Local, \
                 Tag_Name, Num_Value, Operation_Type, Status, Transfer_Id, Transaction_Id, [User]) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                table
            ))
            .bind(record.orig_ts_utc)
            .bind(record.orig_ts_local)
            .bind(Utc::now().naive_utc())
            .bind(Local::now().naive_local())
            .bind(&record.tag_name)
            .bind(record.num_value)
            .bind(OPERATION_TYPE)
            .bind(STATUS)
            .bind(record.transfer_id)
            .bind(record.transaction_id)
            .bind(IMPORT_USER)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to merge tag '{}' into {}", record.tag_name, table))?;
            UpsertOutcome::Inserted
        };

        tx.commit().await.context("Failed to commit merge")?;
        Ok(outcome)
    }
}
