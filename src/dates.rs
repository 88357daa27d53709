// src/dates.rs

//! Plain calendar-day arithmetic (no business days, no holidays).
//!
//! Lead times can come from garbage spreadsheet cells, so shifting saturates
//! at the representable date range instead of panicking.

use chrono::{NaiveDate, TimeDelta};

/// `date + days`, clamped to `NaiveDate::MIN..=NaiveDate::MAX`.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let clamp = if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    };
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(clamp)
}

/// `date - days`, clamped like [`add_days`].
pub fn sub_days(date: NaiveDate, days: i64) -> NaiveDate {
    add_days(date, days.saturating_neg())
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn shifts_across_month_boundaries() {
        assert_eq!(sub_days(d(2025, 3, 10), 21), d(2025, 2, 17));
        assert_eq!(add_days(d(2024, 2, 28), 1), d(2024, 2, 29));
        assert_eq!(days_between(d(2025, 1, 1), d(2025, 1, 22)), 21);
    }

    #[test]
    fn huge_offsets_saturate() {
        assert_eq!(add_days(d(2025, 1, 1), i64::MAX), NaiveDate::MAX);
        assert_eq!(sub_days(d(2025, 1, 1), i64::MAX), NaiveDate::MIN);
        assert_eq!(sub_days(d(2025, 1, 1), i64::MIN), NaiveDate::MAX);
    }
}
