//! Datetime reconstruction.
//!
//! Datasets publish their reporting period in one of four column
//! conventions (see [`TimeConvention`]). Reconstruction picks the convention
//! once per table, derives a naive local time per row, localizes it to
//! Europe/Amsterdam and orders the table by the result.

mod convention;
mod localize;

pub use convention::{
    parse_clock, Slot, TimeConvention, DATETIME_COLUMN, PTU_COLUMN, SEQUENCE_COLUMN, SEQ_NR_COLUMN,
};
pub use localize::{localize_all, shift_forward, AmbiguousPolicy, MARKET_TZ};

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::error::{Result, TennetError};
use crate::table::{Record, Table, Value};

/// Derive the `DATETIME` of every row and sort the table by it.
///
/// Rows whose PTU maps to hour 25 are dropped. Rows that cannot be placed
/// (ambiguous with nothing to infer from, missing clock value) keep an
/// unresolved timestamp and sort last. Duplicate timestamps are kept and
/// reported through [`Table::warnings`].
///
/// An empty table is returned unchanged.
///
/// # Errors
/// - `TennetError::Schema` when no convention matches the columns
/// - `TennetError::MissingDate` when a row has no parsed `DATE`
/// - `TennetError::InvalidValue` when a time column holds garbage
pub fn reconstruct(mut table: Table, policy: AmbiguousPolicy) -> Result<Table> {
    if table.is_empty() {
        return Ok(table);
    }

    let convention =
        TimeConvention::resolve(table.columns()).ok_or_else(|| TennetError::Schema {
            columns: table.columns().to_vec(),
        })?;

    let rows = std::mem::take(table.rows_mut());
    let total = rows.len();
    let mut kept = Vec::with_capacity(total);
    let mut naives = Vec::with_capacity(total);

    for (row, record) in rows.into_iter().enumerate() {
        let date = record.date.ok_or_else(|| TennetError::MissingDate { row })?;

        let naive = match convention.slot(&record)? {
            Slot::Drop => continue,
            Slot::Unresolved => None,
            Slot::At(time) => Some(date.and_time(time)),
        };

        naives.push(naive);
        kept.push(record);
    }

    let order = chronological_order(&kept, &naives);
    for (record, datetime) in kept.iter_mut().zip(localize_all(&naives, &order, policy)) {
        record.datetime = datetime;
    }
    let unresolved = kept.iter().filter(|r| r.datetime.is_none()).count();

    // Stable: unresolved rows go last, ties keep their input order
    kept.sort_by_key(|record| (record.datetime.is_none(), record.datetime));

    let dropped = total - kept.len();
    *table.rows_mut() = kept;

    let duplicates = table.duplicate_datetimes();
    for dt in &duplicates {
        table.add_warning(format!("Duplicate DATETIME {}", dt.to_rfc3339()));
    }
    if !duplicates.is_empty() {
        tracing::warn!(
            count = duplicates.len(),
            first = %duplicates[0].to_rfc3339(),
            "Table contains duplicate timestamps"
        );
    }

    tracing::debug!(
        convention = convention.label(),
        ?policy,
        rows = table.len(),
        dropped,
        unresolved,
        "Reconstructed datetimes"
    );

    Ok(table)
}

/// Row indices from the earliest published row to the latest.
///
/// A complete `SEQUENCE_NUMBER` column fixes the order. Otherwise rows are
/// taken as listed, reversed when their wall-clock times mostly descend.
fn chronological_order(records: &[Record], naives: &[Option<NaiveDateTime>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();

    let sequence: Option<Vec<i64>> = records
        .iter()
        .map(|r| r.get(SEQUENCE_COLUMN).and_then(Value::as_i64))
        .collect();
    if let Some(sequence) = sequence {
        order.sort_by_key(|&i| sequence[i]);
        return order;
    }

    let placed: Vec<NaiveDateTime> = naives.iter().flatten().copied().collect();
    let (mut rising, mut falling) = (0usize, 0usize);
    for pair in placed.windows(2) {
        match pair[0].cmp(&pair[1]) {
            Ordering::Less => rising += 1,
            Ordering::Greater => falling += 1,
            Ordering::Equal => {}
        }
    }

    if falling > rising {
        order.reverse();
    }
    order
}
