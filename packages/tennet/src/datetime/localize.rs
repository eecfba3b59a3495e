//! Localization of naive wall-clock times to Central European time.

use std::collections::BTreeMap;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Time zone every dataset is published in.
pub const MARKET_TZ: Tz = Amsterdam;

/// Upper bound on a DST gap, in minutes.
const MAX_GAP_MINUTES: u32 = 180;

/// What to do with a wall-clock time that occurs twice (autumn fall-back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousPolicy {
    /// Leave the timestamp unresolved.
    Null,
    /// Infer from chronological row order: repeated wall-clock times before
    /// the clock steps back are summer time, from the step back on winter
    /// time. A day whose rows never step back stays unresolved.
    Infer,
}

/// Localize a batch of naive wall-clock times.
///
/// `chronological` lists indices into `naives` from the earliest row to the
/// latest; fall-back inference follows that order, not the slice order.
/// Times in a spring-forward gap are shifted with [`shift_forward`].
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tennet_client::datetime::{localize_all, AmbiguousPolicy};
///
/// let at = |h, m| NaiveDate::from_ymd_opt(2023, 10, 29).unwrap().and_hms_opt(h, m, 0);
/// // Listed newest first: 02:15 winter time, then 02:15 summer time
/// let naives = [at(2, 15), at(2, 15)];
/// let localized = localize_all(&naives, &[1, 0], AmbiguousPolicy::Infer);
///
/// assert_eq!(localized[1].unwrap().to_rfc3339(), "2023-10-29T02:15:00+02:00");
/// assert_eq!(localized[0].unwrap().to_rfc3339(), "2023-10-29T02:15:00+01:00");
/// ```
#[must_use]
pub fn localize_all(
    naives: &[Option<NaiveDateTime>],
    chronological: &[usize],
    policy: AmbiguousPolicy,
) -> Vec<Option<DateTime<Tz>>> {
    let mut localized = vec![None; naives.len()];
    let mut folds: BTreeMap<NaiveDate, Vec<Fold>> = BTreeMap::new();

    for &index in chronological {
        let Some(naive) = naives.get(index).copied().flatten() else {
            continue;
        };

        localized[index] = match MARKET_TZ.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, latest) => {
                folds.entry(naive.date()).or_default().push(Fold {
                    index,
                    naive,
                    earliest,
                    latest,
                });
                None
            }
            LocalResult::None => shift_forward(naive),
        };
    }

    if policy == AmbiguousPolicy::Infer {
        for (day, rows) in folds {
            let Some(step_back) = rows
                .windows(2)
                .position(|pair| pair[1].naive <= pair[0].naive)
                .map(|p| p + 1)
            else {
                tracing::debug!(
                    %day,
                    rows = rows.len(),
                    "Cannot infer DST offset without a step back"
                );
                continue;
            };

            for (n, fold) in rows.iter().enumerate() {
                localized[fold.index] = Some(if n < step_back {
                    fold.earliest
                } else {
                    fold.latest
                });
            }
        }
    }

    localized
}

/// An ambiguous row with both candidate instants.
struct Fold {
    index: usize,
    naive: NaiveDateTime,
    earliest: DateTime<Tz>,
    latest: DateTime<Tz>,
}

/// Move a time that falls in a DST gap to the first valid instant after it.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tennet_client::datetime::shift_forward;
///
/// // 02:30 does not exist on 26 March 2023 in Amsterdam
/// let naive = NaiveDate::from_ymd_opt(2023, 3, 26).unwrap().and_hms_opt(2, 30, 0).unwrap();
/// let shifted = shift_forward(naive).unwrap();
/// assert_eq!(shifted.to_rfc3339(), "2023-03-26T03:00:00+02:00");
/// ```
#[must_use]
pub fn shift_forward(naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let mut probe = naive.with_second(0)?.with_nanosecond(0)?;

    for _ in 0..MAX_GAP_MINUTES {
        probe += TimeDelta::minutes(1);
        if let LocalResult::Single(dt) = MARKET_TZ.from_local_datetime(&probe) {
            return Some(dt);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
    }

    fn in_order(naives: &[Option<NaiveDateTime>], policy: AmbiguousPolicy) -> Vec<Option<String>> {
        let order: Vec<usize> = (0..naives.len()).collect();
        localize_all(naives, &order, policy)
            .into_iter()
            .map(|dt| dt.map(|d| d.to_rfc3339()))
            .collect()
    }

    #[test]
    fn test_localize_regular_time() {
        let result = in_order(
            &[naive(2023, 1, 15, 12, 0), naive(2023, 7, 1, 12, 0), None],
            AmbiguousPolicy::Null,
        );
        assert_eq!(
            result,
            vec![
                Some("2023-01-15T12:00:00+01:00".to_string()),
                Some("2023-07-01T12:00:00+02:00".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_ambiguous_null_policy() {
        let result = in_order(
            &[naive(2023, 10, 29, 2, 15), naive(2023, 10, 29, 2, 15)],
            AmbiguousPolicy::Null,
        );
        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_ambiguous_infer_repeated_time() {
        let naives = [naive(2023, 10, 29, 2, 15), naive(2023, 10, 29, 2, 15)];
        let result = localize_all(&naives, &[0, 1], AmbiguousPolicy::Infer);
        let first = result[0].unwrap();
        let second = result[1].unwrap();

        assert_eq!(first.to_rfc3339(), "2023-10-29T02:15:00+02:00");
        assert_eq!(second.to_rfc3339(), "2023-10-29T02:15:00+01:00");
        assert_eq!((second - first).num_hours(), 1);
    }

    #[test]
    fn test_ambiguous_infer_follows_chronological_order() {
        // Newest first, as the live feed lists its rows
        let naives = [naive(2023, 10, 29, 2, 30), naive(2023, 10, 29, 2, 30)];
        let result = localize_all(&naives, &[1, 0], AmbiguousPolicy::Infer);

        assert_eq!(result[1].unwrap().to_rfc3339(), "2023-10-29T02:30:00+02:00");
        assert_eq!(result[0].unwrap().to_rfc3339(), "2023-10-29T02:30:00+01:00");
    }

    #[test]
    fn test_ambiguous_infer_step_back_without_exact_repeat() {
        // 02:45 summer time, then the clock steps back to 02:00 winter time
        let result = in_order(
            &[
                naive(2023, 10, 29, 2, 30),
                naive(2023, 10, 29, 2, 45),
                naive(2023, 10, 29, 2, 0),
                naive(2023, 10, 29, 2, 15),
            ],
            AmbiguousPolicy::Infer,
        );
        assert_eq!(
            result,
            vec![
                Some("2023-10-29T02:30:00+02:00".to_string()),
                Some("2023-10-29T02:45:00+02:00".to_string()),
                Some("2023-10-29T02:00:00+01:00".to_string()),
                Some("2023-10-29T02:15:00+01:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_ambiguous_infer_without_step_back_is_unresolved() {
        let single = in_order(&[naive(2023, 10, 29, 2, 30)], AmbiguousPolicy::Infer);
        assert_eq!(single, vec![None]);

        let rising = in_order(
            &[naive(2023, 10, 29, 2, 0), naive(2023, 10, 29, 2, 15)],
            AmbiguousPolicy::Infer,
        );
        assert_eq!(rising, vec![None, None]);
    }

    #[test]
    fn test_nonexistent_time_shifts_forward() {
        let result = in_order(
            &[naive(2023, 3, 26, 2, 0), naive(2023, 3, 26, 2, 45)],
            AmbiguousPolicy::Null,
        );
        assert_eq!(
            result,
            vec![
                Some("2023-03-26T03:00:00+02:00".to_string()),
                Some("2023-03-26T03:00:00+02:00".to_string()),
            ]
        );
    }
}
