use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use birthdays::{
    format_birthday, BirthdayProjection, ImportResult, Roster, RosterSummary, UpcomingBirthday,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::clock::Clock;
use crate::config::NotifierConfig;
use crate::digest::days_label;
use crate::mailer::Mailer;

/// Where the roster snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    File(PathBuf),
    Stdin,
}

impl RosterSource {
    /// `-` means stdin.
    pub fn from_arg(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            RosterSource::Stdin
        } else {
            RosterSource::File(path)
        }
    }
}

/// Shared state for every command
pub struct AppState {
    pub config: NotifierConfig,
    pub clock: Arc<dyn Clock>,
    pub mailer: Arc<dyn Mailer>,
    pub roster_source: RosterSource,
}

impl AppState {
    /// Read and validate the roster, re-applying the configured leap-day policy.
    pub fn load_roster(&self) -> anyhow::Result<Roster> {
        let mode = self.config.import_mode;
        let ImportResult { roster, skipped } = match &self.roster_source {
            RosterSource::File(path) => Roster::load_from_file(path, mode)
                .with_context(|| format!("loading roster from {}", path.display()))?,
            RosterSource::Stdin => Roster::import_reader(std::io::stdin().lock(), mode)
                .context("reading roster from stdin")?,
        };

        if !skipped.is_empty() {
            warn!(count = skipped.len(), "members skipped for invalid dates");
        }

        Ok(roster.with_leap_day_policy(self.config.leap_day_policy))
    }
}

// -- Serializable types returned by commands --

#[derive(Serialize, Clone)]
pub struct TodayView {
    pub date: NaiveDate,
    pub birthdays: Vec<BirthdayProjection>,
}

#[derive(Serialize, Clone)]
pub struct UpcomingView {
    pub date: NaiveDate,
    pub window_days: u32,
    pub birthdays: Vec<UpcomingBirthday>,
}

/// One line of the member directory.
#[derive(Serialize, Clone, Debug)]
pub struct MemberRow {
    pub id: String,
    pub full_name: String,
    pub initials: String,
    pub phone: String,
    pub email: Option<String>,
    pub age: u32,
    pub birthday: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct MembersView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub members: Vec<MemberRow>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MemberDetail {
    pub id: String,
    pub full_name: String,
    pub initials: String,
    pub gender: Option<String>,
    pub age: u32,
    pub date_of_birth: String,
    pub birthday: String,
    pub days_until_birthday: u32,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Serialize, Clone, Copy)]
#[serde(transparent)]
pub struct SummaryView(pub RosterSummary);

/// Outcome of one notify run, printed as JSON.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub success: bool,
    pub message: String,
    pub today_count: u32,
    pub upcoming_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
}

impl NotificationOutcome {
    pub fn skipped(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            today_count: 0,
            upcoming_count: 0,
            email_id: None,
        }
    }
}

impl fmt::Display for TodayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.birthdays.is_empty() {
            return writeln!(f, "No birthdays on {}.", format_birthday(self.date));
        }

        writeln!(f, "Celebrating today ({}):", format_birthday(self.date))?;
        for member in &self.birthdays {
            writeln!(f, "  {} turns {}  📞 {}", member.full_name, member.age, member.phone)?;
        }
        Ok(())
    }
}

impl fmt::Display for UpcomingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.birthdays.is_empty() {
            return writeln!(f, "No birthdays in the next {} days.", self.window_days);
        }

        writeln!(f, "Coming up in the next {} days:", self.window_days)?;
        for UpcomingBirthday { member, days_until } in &self.birthdays {
            writeln!(
                f,
                "  {:<12} {}  ({} away)  📞 {}",
                format_birthday(member.date_of_birth),
                member.full_name,
                days_label(*days_until),
                member.phone
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for MembersView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.members.len();
        write!(f, "{} {}", count, if count == 1 { "member" } else { "members" })?;
        if let Some(term) = &self.search {
            write!(f, " found for {term:?}")?;
        }
        writeln!(f)?;

        for row in &self.members {
            writeln!(
                f,
                "  {:<10} [{:<2}] {:<28} {:<3} {:<12} 📞 {}{}",
                row.id,
                row.initials,
                row.full_name,
                row.age,
                row.birthday,
                row.phone,
                row.email.as_deref().map(|e| format!("  📧 {e}")).unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for MemberDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.initials, self.full_name)?;
        if let Some(gender) = &self.gender {
            writeln!(f, "  Gender:        {gender}")?;
        }
        writeln!(f, "  Age:           {} years old", self.age)?;
        writeln!(f, "  Date of birth: {}", self.date_of_birth)?;
        writeln!(
            f,
            "  Birthday:      {} ({})",
            self.birthday,
            match self.days_until_birthday {
                0 => "today".to_string(),
                n => format!("in {}", days_label(n)),
            }
        )?;
        writeln!(f, "  Phone:         {}", self.phone)?;
        if let Some(email) = &self.email {
            writeln!(f, "  Email:         {email}")?;
        }
        if let Some(address) = &self.address {
            writeln!(f, "  Address:       {address}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        writeln!(f, "Total members:   {}", s.member_count)?;
        writeln!(f, "Birthdays today: {}", s.birthdays_today)?;
        writeln!(f, "Coming up:       {} (next {} days)", s.upcoming_birthdays, s.window_days)
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (today: {}, upcoming: {})",
            self.message, self.today_count, self.upcoming_count
        )?;
        if let Some(id) = &self.email_id {
            write!(f, " [email {id}]")?;
        }
        writeln!(f)
    }
}
