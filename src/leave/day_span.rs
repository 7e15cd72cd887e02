use chrono::NaiveDate;

/// Inclusive number of calendar days from `start` to `end`.
///
/// Callers validate `end >= start` first.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_counts_once() {
        assert_eq!(inclusive_days(date(2026, 3, 2), date(2026, 3, 2)), 1);
    }

    #[test]
    fn counts_both_endpoints() {
        assert_eq!(inclusive_days(date(2026, 3, 2), date(2026, 3, 5)), 4);
    }

    #[test]
    fn spans_month_and_leap_day() {
        assert_eq!(inclusive_days(date(2028, 2, 27), date(2028, 3, 1)), 4);
    }
}
