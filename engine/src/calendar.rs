//! Calendar arithmetic for birthdays
//!
//! Every function takes the evaluation date explicitly. Callers truncate their
//! own instant to a date in the office's timezone before calling in, so "today"
//! is always midnight-aligned and day differences are exact.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

use crate::error::{BirthdayError, Result};

// ============================================================================
// Leap day handling
// ============================================================================

/// How a 29 February birthday is observed in a common year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeapDayPolicy {
    /// Never "today" in a common year. Distances and windows still count to
    /// 1 March so the member stays in upcoming lists.
    #[default]
    Skip,
    /// Celebrated on 28 February in common years.
    February28,
    /// Celebrated on 1 March in common years.
    March1,
}

impl LeapDayPolicy {
    /// The day a birthday falls on in `year`, or `None` when it does not occur.
    pub fn observed_in(self, date_of_birth: NaiveDate, year: i32) -> Option<NaiveDate> {
        if let Some(day) = NaiveDate::from_ymd_opt(year, date_of_birth.month(), date_of_birth.day()) {
            return Some(day);
        }

        // Only 29 February can be missing from a year.
        match self {
            LeapDayPolicy::Skip => None,
            LeapDayPolicy::February28 => NaiveDate::from_ymd_opt(year, 2, 28),
            LeapDayPolicy::March1 => NaiveDate::from_ymd_opt(year, 3, 1),
        }
    }

    /// The day distances are measured to in `year`. Unlike `observed_in`,
    /// every policy yields a date, `Skip` rolling 29 February over to 1 March.
    pub fn counted_in(self, date_of_birth: NaiveDate, year: i32) -> Option<NaiveDate> {
        self.observed_in(date_of_birth, year)
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a calendar date from the store.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (the date in the timestamp's
/// own offset is kept). Anything else is rejected with `InvalidDate` rather
/// than coerced.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BirthdayError::invalid_date(value, "empty date"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| BirthdayError::invalid_date(value, e.to_string()))
}

/// Parse a row timestamp (`created_at`, `updated_at`).
///
/// RFC 3339 is the normal form. A bare date or a naive `YYYY-MM-DD HH:MM:SS`
/// value is read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    parse_date(trimmed).map(|date| date.and_time(chrono::NaiveTime::default()).and_utc())
}

// ============================================================================
// Age
// ============================================================================

/// Completed years between `date_of_birth` and `now`.
///
/// A date of birth after `now` clamps to 0.
pub fn calculate_age(date_of_birth: NaiveDate, now: NaiveDate) -> u32 {
    calculate_age_with_policy(date_of_birth, now, LeapDayPolicy::default())
}

/// Completed years, where a 29 February birthday completes a year on the day
/// the policy observes it.
pub fn calculate_age_with_policy(
    date_of_birth: NaiveDate,
    now: NaiveDate,
    policy: LeapDayPolicy,
) -> u32 {
    if date_of_birth > now {
        return 0;
    }

    let anniversary_reached = match policy.observed_in(date_of_birth, now.year()) {
        Some(observed) => now >= observed,
        None => (now.month(), now.day()) >= (date_of_birth.month(), date_of_birth.day()),
    };

    let years = now.year() - date_of_birth.year() - i32::from(!anniversary_reached);
    u32::try_from(years).unwrap_or(0)
}

// ============================================================================
// Anniversaries
// ============================================================================

/// True iff month and day match `now`. Year of birth is irrelevant.
///
/// A 29 February birthday never matches in a common year.
pub fn is_birthday_today(date_of_birth: NaiveDate, now: NaiveDate) -> bool {
    is_birthday_today_with_policy(date_of_birth, now, LeapDayPolicy::default())
}

pub fn is_birthday_today_with_policy(
    date_of_birth: NaiveDate,
    now: NaiveDate,
    policy: LeapDayPolicy,
) -> bool {
    policy.observed_in(date_of_birth, now.year()) == Some(now)
}

/// This year's anniversary, or next year's once this year's has passed.
///
/// `None` only past the end of chrono's date range.
pub fn next_birthday(
    date_of_birth: NaiveDate,
    now: NaiveDate,
    policy: LeapDayPolicy,
) -> Option<NaiveDate> {
    match policy.counted_in(date_of_birth, now.year()) {
        Some(candidate) if candidate >= now => Some(candidate),
        _ => policy.counted_in(date_of_birth, now.year() + 1),
    }
}

/// Days from `now` to the next birthday, in `[0, 366]`. 0 when the birthday
/// is today.
pub fn days_until_birthday(date_of_birth: NaiveDate, now: NaiveDate) -> u32 {
    days_until_birthday_with_policy(date_of_birth, now, LeapDayPolicy::default())
}

pub fn days_until_birthday_with_policy(
    date_of_birth: NaiveDate,
    now: NaiveDate,
    policy: LeapDayPolicy,
) -> u32 {
    // u32::MAX only past the end of chrono's date range.
    next_birthday(date_of_birth, now, policy)
        .and_then(|next| u32::try_from((next - now).num_days()).ok())
        .unwrap_or(u32::MAX)
}

/// True iff the next birthday falls within `[now, now + days]`.
pub fn is_birthday_in_next_days(date_of_birth: NaiveDate, now: NaiveDate, days: u32) -> bool {
    is_birthday_in_next_days_with_policy(date_of_birth, now, days, LeapDayPolicy::default())
}

pub fn is_birthday_in_next_days_with_policy(
    date_of_birth: NaiveDate,
    now: NaiveDate,
    days: u32,
    policy: LeapDayPolicy,
) -> bool {
    let Some(next) = next_birthday(date_of_birth, now, policy) else {
        return false;
    };

    match now.checked_add_days(Days::new(u64::from(days))) {
        Some(end) => next <= end,
        None => true,
    }
}

// ============================================================================
// Display
// ============================================================================

/// Month name and day, no year: "June 1".
pub fn format_birthday(date_of_birth: NaiveDate) -> String {
    date_of_birth.format("%B %-d").to_string()
}

/// Full date with an ordinal day: "June 1st, 1990".
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_completed_years() {
        let now = date(2024, 6, 1);
        assert_eq!(calculate_age(date(1990, 6, 1), now), 34);
        assert_eq!(calculate_age(date(1990, 6, 2), now), 33);
        assert_eq!(calculate_age(date(1990, 5, 31), now), 34);
        assert_eq!(calculate_age(now, now), 0);
    }

    #[test]
    fn test_age_boundary_not_yet_crossed() {
        // 30th birthday is tomorrow.
        let now = date(2024, 6, 1);
        let birth = date(1994, 6, 2);
        assert_eq!(calculate_age(birth, now), 29);

        let birth = date(1994, 5, 31);
        assert_eq!(calculate_age(birth, now), 30);
    }

    #[test]
    fn test_age_future_birth_clamps_to_zero() {
        assert_eq!(calculate_age(date(2030, 1, 1), date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_age_leap_day_policies() {
        let leapling = date(2000, 2, 29);
        let feb28 = date(2023, 2, 28);
        let mar1 = date(2023, 3, 1);

        assert_eq!(calculate_age(leapling, feb28), 22);
        assert_eq!(calculate_age(leapling, mar1), 23);
        assert_eq!(calculate_age_with_policy(leapling, feb28, LeapDayPolicy::February28), 23);
        assert_eq!(calculate_age_with_policy(leapling, mar1, LeapDayPolicy::March1), 23);
        assert_eq!(calculate_age(leapling, date(2024, 2, 29)), 24);
    }

    #[test]
    fn test_birthday_today_ignores_year() {
        let now = date(2024, 6, 1);
        assert!(is_birthday_today(date(1990, 6, 1), now));
        assert!(is_birthday_today(date(2024, 6, 1), now));
        assert!(!is_birthday_today(date(1990, 6, 2), now));
        assert!(!is_birthday_today(date(1990, 7, 1), now));
    }

    #[test]
    fn test_leap_day_never_fires_in_common_year_by_default() {
        let leapling = date(2000, 2, 29);
        assert!(!is_birthday_today(leapling, date(2023, 2, 28)));
        assert!(!is_birthday_today(leapling, date(2023, 3, 1)));
        assert!(is_birthday_today(leapling, date(2024, 2, 29)));

        assert!(is_birthday_today_with_policy(leapling, date(2023, 2, 28), LeapDayPolicy::February28));
        assert!(is_birthday_today_with_policy(leapling, date(2023, 3, 1), LeapDayPolicy::March1));
    }

    #[test]
    fn test_days_until_wraps_into_next_year() {
        assert_eq!(days_until_birthday(date(1999, 1, 2), date(2024, 12, 30)), 3);
        assert_eq!(days_until_birthday(date(1985, 6, 5), date(2024, 6, 1)), 4);
        assert_eq!(days_until_birthday(date(1990, 6, 1), date(2024, 6, 1)), 0);
        // Yesterday's birthday is a full year away (2025 is not a leap year).
        assert_eq!(days_until_birthday(date(1990, 5, 31), date(2024, 6, 1)), 364);
    }

    #[test]
    fn test_days_until_stays_within_a_year() {
        // Every birth day of a leap year, evaluated on every day of a common
        // year and a leap year.
        for now_year in [2023, 2024] {
            let mut now = date(now_year, 1, 1);
            while now.year() == now_year {
                let mut birth = date(2000, 1, 1);
                while birth.year() == 2000 {
                    for policy in [LeapDayPolicy::Skip, LeapDayPolicy::February28, LeapDayPolicy::March1] {
                        let days = days_until_birthday_with_policy(birth, now, policy);
                        assert!(days <= 366, "{birth} from {now} with {policy:?}: {days}");
                    }
                    birth = birth.succ_opt().unwrap();
                }
                now = now.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_days_until_leap_day_policies() {
        let leapling = date(2000, 2, 29);
        let now = date(2025, 2, 20);
        // Skip counts to 1 March in a common year.
        assert_eq!(next_birthday(leapling, now, LeapDayPolicy::Skip), Some(date(2025, 3, 1)));
        assert_eq!(days_until_birthday(leapling, now), 9);
        assert_eq!(days_until_birthday_with_policy(leapling, now, LeapDayPolicy::February28), 8);
        assert_eq!(days_until_birthday_with_policy(leapling, now, LeapDayPolicy::March1), 9);

        // Just after a real 29 February the next one counted is 1 March 2025.
        assert_eq!(days_until_birthday(leapling, date(2024, 3, 1)), 365);
        assert_eq!(days_until_birthday(leapling, date(2024, 2, 29)), 0);
    }

    #[test]
    fn test_leap_day_in_window_by_default() {
        let leapling = date(2000, 2, 29);
        assert!(is_birthday_in_next_days(leapling, date(2025, 2, 25), 7));
        assert!(!is_birthday_in_next_days(leapling, date(2025, 2, 20), 7));
        assert!(is_birthday_in_next_days(leapling, date(2024, 2, 25), 7));
    }

    #[test]
    fn test_next_days_window_is_inclusive() {
        let now = date(2024, 6, 1);
        assert!(is_birthday_in_next_days(date(1990, 6, 1), now, 7));
        assert!(is_birthday_in_next_days(date(1990, 6, 8), now, 7));
        assert!(!is_birthday_in_next_days(date(1990, 6, 9), now, 7));
        assert!(!is_birthday_in_next_days(date(1990, 5, 31), now, 7));
        assert!(is_birthday_in_next_days(date(1990, 6, 1), now, 0));
    }

    #[test]
    fn test_next_days_window_crosses_new_year() {
        let now = date(2024, 12, 28);
        assert!(is_birthday_in_next_days(date(1980, 1, 3), now, 7));
        assert!(!is_birthday_in_next_days(date(1980, 1, 5), now, 7));
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("1990-06-01").unwrap(), date(1990, 6, 1));
        assert_eq!(parse_date(" 1990-06-01 ").unwrap(), date(1990, 6, 1));
        assert_eq!(parse_date("1990-06-01T00:00:00+00:00").unwrap(), date(1990, 6, 1));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_matches!(parse_date(""), Err(BirthdayError::InvalidDate { .. }));
        assert_matches!(parse_date("not a date"), Err(BirthdayError::InvalidDate { .. }));
        assert_matches!(parse_date("1990-02-30"), Err(BirthdayError::InvalidDate { .. }));
        assert_matches!(parse_date("1990-13-01"), Err(BirthdayError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let ts = parse_timestamp("2024-01-05T10:11:12+02:00").unwrap();
        assert_eq!(ts, date(2024, 1, 5).and_hms_opt(8, 11, 12).unwrap().and_utc());

        let naive = parse_timestamp("2024-01-05 10:11:12").unwrap();
        assert_eq!(naive.date_naive(), date(2024, 1, 5));

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_format_birthday() {
        assert_eq!(format_birthday(date(1990, 6, 1)), "June 1");
        assert_eq!(format_birthday(date(2000, 12, 25)), "December 25");
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date(date(1990, 6, 1)), "June 1st, 1990");
        assert_eq!(format_long_date(date(1990, 6, 2)), "June 2nd, 1990");
        assert_eq!(format_long_date(date(1990, 6, 3)), "June 3rd, 1990");
        assert_eq!(format_long_date(date(1990, 6, 11)), "June 11th, 1990");
        assert_eq!(format_long_date(date(1990, 6, 22)), "June 22nd, 1990");
        assert_eq!(format_long_date(date(1990, 6, 13)), "June 13th, 1990");
    }
}
