//! Church Birthdays Engine
//!
//! Pure date arithmetic over a member roster: who has a birthday today, who has
//! one coming up, and how old they are. The evaluation date is always passed
//! in; nothing here reads the clock or touches the network.

pub mod birthdays;
pub mod calendar;
pub mod error;
pub mod member;
pub mod names;
pub mod persistence;
pub mod roster;

pub use birthdays::{get_todays_birthdays, get_upcoming_birthdays, DEFAULT_UPCOMING_DAYS};
pub use calendar::{
    calculate_age, calculate_age_with_policy, days_until_birthday, days_until_birthday_with_policy,
    format_birthday, format_long_date, is_birthday_in_next_days, is_birthday_in_next_days_with_policy,
    is_birthday_today, is_birthday_today_with_policy, parse_date, LeapDayPolicy,
};
pub use error::BirthdayError;
pub use member::{BirthdayProjection, MemberId, MemberRecord, RawMemberRecord};
pub use persistence::{ImportMode, ImportResult, RosterFile, SaveStats, SkippedRecord};
pub use roster::{BirthdayReport, Roster, RosterSummary, UpcomingBirthday};
