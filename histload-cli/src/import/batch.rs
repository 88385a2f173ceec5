//! Batch identifier pair shared by all rows imported from one sheet

use anyhow::Result;

use crate::store::MeasurementStore;

/// Monotonically increasing identifier pair, assigned once per sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchIds {
    pub transfer_id: i64,
    pub transaction_id: i64,
}

impl BatchIds {
    /// Pair used when the store cannot be queried for its current maxima
    pub const FALLBACK: BatchIds = BatchIds {
        transfer_id: 1,
        transaction_id: 1,
    };

    /// The pair the next sheet would receive if nothing else wrote to the
    /// table in between. Advisory: each sheet re-derives its pair from the
    /// store.
    pub fn advanced(self) -> BatchIds {
        BatchIds {
            transfer_id: self.transfer_id + 1,
            transaction_id: self.transaction_id + 1,
        }
    }
}

impl std::fmt::Display for BatchIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.transfer_id, self.transaction_id)
    }
}

/// Derive the next identifier pair from the table's current maxima.
///
/// An empty table (NULL maxima) yields `(1, 1)`. Query failures propagate
/// unchanged; the fallback policy belongs to the caller.
pub async fn next_batch_ids<S>(store: &S, table: &str) -> Result<BatchIds>
where
    S: MeasurementStore + ?Sized,
{
    let last = store.last_batch_ids(table).await?.unwrap_or(BatchIds {
        transfer_id: 0,
        transaction_id: 0,
    });

    Ok(BatchIds {
        transfer_id: last.transfer_id + 1,
        transaction_id: last.transaction_id + 1,
    })
}
