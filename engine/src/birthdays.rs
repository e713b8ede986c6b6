//! Birthday selection over a roster
//!
//! Pure functions: the roster and the evaluation date go in, projections come
//! out. Nothing here reads the clock.

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{self, LeapDayPolicy};
use crate::member::{BirthdayProjection, MemberRecord};

/// Upcoming window used by the dashboard and the daily email.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// Members whose birthday is `now`, in roster order.
pub fn get_todays_birthdays(roster: &[MemberRecord], now: NaiveDate) -> Vec<BirthdayProjection> {
    get_todays_birthdays_with_policy(roster, now, LeapDayPolicy::default())
}

pub fn get_todays_birthdays_with_policy(
    roster: &[MemberRecord],
    now: NaiveDate,
    policy: LeapDayPolicy,
) -> Vec<BirthdayProjection> {
    roster
        .iter()
        .filter(|member| calendar::is_birthday_today_with_policy(member.date_of_birth, now, policy))
        .map(|member| BirthdayProjection::project(member, now, policy))
        .collect()
}

/// Members with a birthday in the next `days` days, excluding today.
///
/// Soonest first; members on the same day keep their roster order.
pub fn get_upcoming_birthdays(
    roster: &[MemberRecord],
    now: NaiveDate,
    days: u32,
) -> Vec<BirthdayProjection> {
    get_upcoming_birthdays_with_policy(roster, now, days, LeapDayPolicy::default())
}

pub fn get_upcoming_birthdays_with_policy(
    roster: &[MemberRecord],
    now: NaiveDate,
    days: u32,
    policy: LeapDayPolicy,
) -> Vec<BirthdayProjection> {
    let mut upcoming: Vec<(u32, BirthdayProjection)> = roster
        .iter()
        .filter(|member| {
            let dob = member.date_of_birth;
            !calendar::is_birthday_today_with_policy(dob, now, policy)
                && calendar::is_birthday_in_next_days_with_policy(dob, now, days, policy)
        })
        .map(|member| {
            let days_until =
                calendar::days_until_birthday_with_policy(member.date_of_birth, now, policy);
            debug!(member = %member.id, days_until, "upcoming birthday");
            (days_until, BirthdayProjection::project(member, now, policy))
        })
        .collect();

    // sort_by_key is stable, so ties keep roster order.
    upcoming.sort_by_key(|(days_until, _)| *days_until);
    upcoming.into_iter().map(|(_, projection)| projection).collect()
}
