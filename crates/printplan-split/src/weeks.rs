//! Date range → week slots. Dates are epoch milliseconds, bucketed by UTC
//! calendar day.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// UTC calendar day of an epoch-millisecond timestamp.
pub fn day_of(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Epoch milliseconds at UTC midnight of `date`.
pub fn date_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Longest split seeded from dates; ten years of weeks.
pub const DEFAULT_MAX_WEEKS: usize = 520;

/// Number of weeks spanned by `[start, due]`, both days inclusive:
/// `ceil(days / 7)`. `None` when due precedes start or the span is longer
/// than `max_weeks`.
pub fn week_count(start_millis: i64, due_millis: i64, max_weeks: usize) -> Option<usize> {
    let start = day_of(start_millis)?;
    let due = day_of(due_millis)?;
    let days = (due - start).num_days() + 1;
    if days < 1 {
        return None;
    }
    usize::try_from((days + 6) / 7)
        .ok()
        .filter(|&count| count <= max_weeks)
}

/// First day of each of `count` weeks starting at `start`.
pub fn week_starts(start_millis: i64, count: usize) -> Vec<NaiveDate> {
    let Some(start) = day_of(start_millis) else {
        return Vec::new();
    };
    (0..count as u64)
        .filter_map(|i| start.checked_add_days(Days::new(i * 7)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(y: i32, m: u32, d: u32) -> i64 {
        date_millis(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    #[test]
    fn test_week_count_rounds_up() {
        let start = millis(2026, 1, 5);
        assert_eq!(week_count(start, start, DEFAULT_MAX_WEEKS), Some(1));
        assert_eq!(week_count(start, millis(2026, 1, 11), DEFAULT_MAX_WEEKS), Some(1));
        assert_eq!(week_count(start, millis(2026, 1, 12), DEFAULT_MAX_WEEKS), Some(2));
        assert_eq!(week_count(start, millis(2026, 1, 18), DEFAULT_MAX_WEEKS), Some(2));
        assert_eq!(week_count(start, millis(2026, 1, 19), DEFAULT_MAX_WEEKS), Some(3));
    }

    #[test]
    fn test_week_count_ignores_time_of_day() {
        let start = millis(2026, 3, 2) + 17 * 3_600_000;
        let due = millis(2026, 3, 8) + 3_600_000;
        assert_eq!(week_count(start, due, DEFAULT_MAX_WEEKS), Some(1));
    }

    #[test]
    fn test_due_before_start_has_no_weeks() {
        assert_eq!(
            week_count(millis(2026, 2, 10), millis(2026, 2, 9), DEFAULT_MAX_WEEKS),
            None
        );
    }

    #[test]
    fn test_span_longer_than_cap_has_no_weeks() {
        let start = millis(2026, 1, 5);
        assert_eq!(week_count(start, millis(2026, 3, 1), 8), Some(8));
        assert_eq!(week_count(start, millis(2026, 3, 2), 8), None);
        assert_eq!(week_count(start, millis(2100, 1, 1), DEFAULT_MAX_WEEKS), None);
    }

    #[test]
    fn test_week_starts_step_by_seven_days() {
        let starts = week_starts(millis(2026, 1, 26), 3);
        assert_eq!(
            starts,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
            ]
        );
    }
}
