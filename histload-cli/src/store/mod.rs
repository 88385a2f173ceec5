//! Destination store seam for the reconciliation engine

pub mod sqlite;

pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::import::batch::BatchIds;
use crate::import::record::Record;

/// What the merge did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Destination table operations the import pipeline needs.
///
/// The merge contract: after any number of applications there is at most
/// one row per natural key `(Orig_TS_Local, Tag_Name)`, and its `Num_Value`
/// equals the last value applied.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Current maximum identifier pair, or `None` when the table is empty
    async fn last_batch_ids(&self, table: &str) -> Result<Option<BatchIds>>;

    /// Merge one record by natural key: update `Num_Value` on a match,
    /// insert the full row otherwise. One statement per record, no retry.
    async fn upsert_by_key(&self, table: &str, record: &Record) -> Result<UpsertOutcome>;
}
