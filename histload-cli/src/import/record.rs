//! Normalized measurement records built from raw sheet rows

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::import::batch::BatchIds;
use crate::import::value::coerce_numeric;

/// Operation type stamped on every inserted row
pub const OPERATION_TYPE: i64 = 1;
/// Status stamped on every inserted row
pub const STATUS: i64 = 1;
/// Import agent recorded in the `[User]` column
pub const IMPORT_USER: &str = "histload";

/// Hours between the UTC and local observation timestamps
const LOCAL_UTC_OFFSET_HOURS: i64 = 2;

/// One row of imported data, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Observation date at midnight, UTC base
    pub orig_ts_utc: NaiveDateTime,
    /// Observation date shifted by the fixed local offset; half of the
    /// natural key
    pub orig_ts_local: NaiveDateTime,
    /// Measured series; the other half of the natural key
    pub tag_name: String,
    pub num_value: f64,
    pub transfer_id: i64,
    pub transaction_id: i64,
}

impl Record {
    /// Build a record from a raw sheet row and the sheet's identifier pair.
    ///
    /// `row[0]` is the tag name, `row[1]` the observation date, `row[2]` the
    /// measured value. A missing value cell yields `0.0`; a present but
    /// unparseable one is an error. The time-of-day components are fixed
    /// constants, not derived from the cell.
    pub fn build(row: &[String], ids: BatchIds) -> Result<Record> {
        let tag_name = row.first().map(|cell| cell.trim()).unwrap_or_default();
        if tag_name.is_empty() {
            bail!("row has no tag name");
        }

        let date = match row.get(1) {
            Some(cell) => parse_observation_date(cell)?,
            None => bail!("row for tag '{}' has no observation date", tag_name),
        };

        let num_value = match row.get(2) {
            Some(cell) => coerce_numeric(cell)?,
            None => 0.0,
        };

        let orig_ts_utc = date.and_time(NaiveTime::MIN);
        Ok(Record {
            orig_ts_utc,
            orig_ts_local: orig_ts_utc + Duration::hours(LOCAL_UTC_OFFSET_HOURS),
            tag_name: tag_name.to_string(),
            num_value,
            transfer_id: ids.transfer_id,
            transaction_id: ids.transaction_id,
        })
    }
}

/// Day-granularity date from a cell. Accepts a bare ISO date or the
/// `YYYY-MM-DD HH:MM:SS` / ISO-8601 shapes date cells render to.
fn parse_observation_date(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .with_context(|| format!("cannot parse observation date '{}'", raw))
}
