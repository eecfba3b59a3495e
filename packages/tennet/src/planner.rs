//! Date-window planning.
//!
//! Export endpoints only serve a limited date range per request. The planner
//! splits a caller range into contiguous, non-overlapping windows whose union
//! is exactly the requested range.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::validate_date_range;
use crate::error::Result;

/// How a dataset's date range is split into requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chunking {
    /// The endpoint serves any range in one call.
    Single,
    /// One request per calendar month touched.
    Monthly,
    /// One request per day (per-day file endpoints).
    Daily,
}

/// A closed range of calendar dates, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "window start must not lie after its end");
        Self { start, end }
    }

    /// Window covering a single day.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Number of days in the window.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate over every day in the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Split `[start, end]` into request windows.
///
/// # Errors
/// `TennetError::InvalidDateRange` when `start > end`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tennet_client::planner::{plan, Chunking};
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
///
/// let windows = plan(Chunking::Monthly, start, end).unwrap();
/// assert_eq!(windows.len(), 3);
/// assert_eq!(windows[1].start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
/// assert_eq!(windows[1].end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn plan(chunking: Chunking, start: NaiveDate, end: NaiveDate) -> Result<Vec<DateWindow>> {
    validate_date_range(start, end)?;

    let windows = match chunking {
        Chunking::Single => vec![DateWindow::new(start, end)],
        Chunking::Daily => DateWindow::new(start, end).days().map(DateWindow::day).collect(),
        Chunking::Monthly => monthly_windows(start, end),
    };

    tracing::debug!(
        ?chunking,
        %start,
        %end,
        windows = windows.len(),
        "Planned request windows"
    );

    Ok(windows)
}

fn monthly_windows(start: NaiveDate, end: NaiveDate) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let window_end = last_day_of_month(cursor).min(end);
        windows.push(DateWindow::new(cursor, window_end));

        match window_end.checked_add_days(Days::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    windows
}

/// Last calendar day of the month `date` falls in.
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
