//! Column conventions a dataset can carry its time-of-day in.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::error::{Result, TennetError};
use crate::table::{Record, Value};

/// Name given to the derived timestamp.
pub const DATETIME_COLUMN: &str = "DATETIME";

pub const SEQ_NR_COLUMN: &str = "SEQ_NR";
pub const PTU_COLUMN: &str = "PTU";

/// Publication counter of the live feeds; orders rows chronologically.
pub const SEQUENCE_COLUMN: &str = "SEQUENCE_NUMBER";

/// Column name fragments marking an explicit period start.
const PERIOD_FROM_MARKERS: &[&str] = &["PERIOD_FROM", "PERIODE_VAN"];
const TIME_MARKER: &str = "TIME";

/// Clock value: H:MM or HH:MM, optionally with seconds.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("valid regex")
});

/// The rule used to derive a row's local time of day.
///
/// Resolved once per table from its column set; the first matching variant in
/// declaration order wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeConvention {
    /// `DATE` + the named period-start column (`HH:MM`).
    PeriodFrom(String),
    /// `DATE` + the named time column (`HH:MM`).
    Time(String),
    /// `SEQ_NR - 1` whole hours after midnight.
    SeqNr,
    /// 15-minute programme time unit index.
    Ptu,
}

/// Where a row lands on its calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A valid local time of day.
    At(NaiveTime),
    /// The row cannot be placed; it is kept with an unresolved timestamp.
    Unresolved,
    /// The row refers to a PTU past the end of the day and is discarded.
    Drop,
}

impl TimeConvention {
    /// Pick the convention for a column set.
    ///
    /// # Examples
    /// ```
    /// use tennet_client::datetime::TimeConvention;
    ///
    /// let columns = vec!["DATE".to_string(), "TIME".to_string(), "PERIOD_FROM".to_string()];
    /// assert_eq!(
    ///     TimeConvention::resolve(&columns),
    ///     Some(TimeConvention::PeriodFrom("PERIOD_FROM".to_string()))
    /// );
    /// ```
    #[must_use]
    pub fn resolve(columns: &[String]) -> Option<Self> {
        if let Some(column) = columns
            .iter()
            .find(|c| PERIOD_FROM_MARKERS.iter().any(|m| c.contains(m)))
        {
            return Some(Self::PeriodFrom(column.clone()));
        }

        if let Some(column) = columns
            .iter()
            .find(|c| c.as_str() != DATETIME_COLUMN && c.contains(TIME_MARKER))
        {
            return Some(Self::Time(column.clone()));
        }

        if columns.iter().any(|c| c == SEQ_NR_COLUMN) {
            return Some(Self::SeqNr);
        }

        if columns.iter().any(|c| c == PTU_COLUMN) {
            return Some(Self::Ptu);
        }

        None
    }

    /// Short label for logging.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::PeriodFrom(column) | Self::Time(column) => column.as_str(),
            Self::SeqNr => SEQ_NR_COLUMN,
            Self::Ptu => PTU_COLUMN,
        }
    }

    /// Derive the local time-of-day slot for one record.
    pub fn slot(&self, record: &Record) -> Result<Slot> {
        match self {
            Self::PeriodFrom(column) | Self::Time(column) => clock_slot(record, column),
            Self::SeqNr => seq_nr_slot(record),
            Self::Ptu => ptu_slot(record),
        }
    }
}

fn invalid(column: &str, value: &Value) -> TennetError {
    TennetError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn clock_slot(record: &Record, column: &str) -> Result<Slot> {
    let value = match record.get(column) {
        None | Some(Value::Null) => return Ok(Slot::Unresolved),
        Some(value) => value,
    };

    parse_clock(&value.to_string())
        .map(Slot::At)
        .ok_or_else(|| invalid(column, value))
}

/// Parse an `HH:MM` or `HH:MM:SS` clock value.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use tennet_client::datetime::parse_clock;
///
/// assert_eq!(parse_clock("07:45"), NaiveTime::from_hms_opt(7, 45, 0));
/// assert_eq!(parse_clock("7:45:30"), NaiveTime::from_hms_opt(7, 45, 30));
/// assert_eq!(parse_clock("24:00"), None);
/// ```
#[must_use]
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_PATTERN.captures(text.trim())?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let second: u32 = match caps.get(3) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn integer_cell(record: &Record, column: &str) -> Result<Option<i64>> {
    match record.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(column, value)),
    }
}

fn seq_nr_slot(record: &Record) -> Result<Slot> {
    let Some(seq) = integer_cell(record, SEQ_NR_COLUMN)? else {
        return Ok(Slot::Unresolved);
    };

    // The 25th hour of a fall-back day has no wall-clock slot of its own.
    let slot = seq
        .checked_sub(1)
        .and_then(|hour| u32::try_from(hour).ok())
        .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .map_or(Slot::Unresolved, Slot::At);
    Ok(slot)
}

fn ptu_slot(record: &Record) -> Result<Slot> {
    let Some(ptu) = integer_cell(record, PTU_COLUMN)? else {
        return Ok(Slot::Unresolved);
    };

    if ptu < 0 {
        return Err(TennetError::InvalidValue {
            column: PTU_COLUMN.to_string(),
            value: ptu.to_string(),
        });
    }

    let minute = (ptu % 4) * 15;
    let hour = match ptu / 4 {
        24 => 0,
        25 => return Ok(Slot::Drop),
        h => h,
    };

    u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .map(Slot::At)
        .ok_or_else(|| TennetError::InvalidValue {
            column: PTU_COLUMN.to_string(),
            value: ptu.to_string(),
        })
}
