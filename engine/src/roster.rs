//! Roster - the member snapshot every evaluation runs against

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::birthdays;
use crate::calendar::{self, LeapDayPolicy};
use crate::member::{BirthdayProjection, MemberId, MemberRecord};

/// Name-ordered collection of members.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<MemberRecord>,
    pub leap_day_policy: LeapDayPolicy,
}

/// An upcoming birthday with its distance from the evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    #[serde(flatten)]
    pub member: BirthdayProjection,
    pub days_until: u32,
}

/// Everything one evaluation produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayReport {
    pub date: NaiveDate,
    pub window_days: u32,
    pub today: Vec<BirthdayProjection>,
    pub upcoming: Vec<UpcomingBirthday>,
}

impl BirthdayReport {
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.upcoming.is_empty()
    }
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub member_count: u32,
    pub birthdays_today: u32,
    pub upcoming_birthdays: u32,
    pub window_days: u32,
}

impl Roster {
    /// Build a roster ordered by full name, case-insensitively, ties by id.
    pub fn new(mut members: Vec<MemberRecord>) -> Self {
        members.sort_by(|a, b| {
            a.full_name
                .to_lowercase()
                .cmp(&b.full_name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });

        Self {
            members,
            leap_day_policy: LeapDayPolicy::default(),
        }
    }

    pub fn with_leap_day_policy(mut self, policy: LeapDayPolicy) -> Self {
        self.leap_day_policy = policy;
        self
    }

    pub fn members(&self) -> &[MemberRecord] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find(&self, id: &MemberId) -> Option<&MemberRecord> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Members whose name, phone or email contains `term`, ignoring case.
    /// A blank term matches everyone. Roster order is kept.
    pub fn search(&self, term: &str) -> Vec<&MemberRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.members.iter().collect();
        }

        self.members
            .iter()
            .filter(|member| {
                member.full_name.to_lowercase().contains(&term)
                    || member.phone.to_lowercase().contains(&term)
                    || member
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn todays_birthdays(&self, now: NaiveDate) -> Vec<BirthdayProjection> {
        birthdays::get_todays_birthdays_with_policy(&self.members, now, self.leap_day_policy)
    }

    pub fn upcoming_birthdays(&self, now: NaiveDate, days: u32) -> Vec<BirthdayProjection> {
        birthdays::get_upcoming_birthdays_with_policy(&self.members, now, days, self.leap_day_policy)
    }

    /// Today's and upcoming birthdays in one pass over the calendar.
    pub fn report(&self, now: NaiveDate, days: u32) -> BirthdayReport {
        let upcoming = self
            .upcoming_birthdays(now, days)
            .into_iter()
            .map(|member| UpcomingBirthday {
                days_until: calendar::days_until_birthday_with_policy(
                    member.date_of_birth,
                    now,
                    self.leap_day_policy,
                ),
                member,
            })
            .collect();

        BirthdayReport {
            date: now,
            window_days: days,
            today: self.todays_birthdays(now),
            upcoming,
        }
    }

    pub fn summary(&self, now: NaiveDate, days: u32) -> RosterSummary {
        let report = self.report(now, days);
        RosterSummary {
            member_count: self.members.len() as u32,
            birthdays_today: report.today.len() as u32,
            upcoming_birthdays: report.upcoming.len() as u32,
            window_days: days,
        }
    }
}
