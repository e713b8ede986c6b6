//! One birthday notification run: evaluate the roster, render, hand off.

use anyhow::Context;
use birthdays::Roster;
use chrono::NaiveDate;
use tracing::info;

use crate::digest;
use crate::mailer::OutgoingEmail;
use crate::state::{AppState, NotificationOutcome};

/// Evaluate an already-loaded roster and send the digest if there is anything to say.
pub fn notify_roster(
    state: &AppState,
    roster: &Roster,
    today: NaiveDate,
) -> anyhow::Result<NotificationOutcome> {
    if roster.is_empty() {
        info!("roster is empty, nothing to notify");
        return Ok(NotificationOutcome::skipped("No members to check"));
    }

    let report = roster.report(today, state.config.upcoming_days);
    let today_count = report.today.len() as u32;
    let upcoming_count = report.upcoming.len() as u32;
    info!(date = %today, today_count, upcoming_count, "birthday check complete");

    let Some(digest) = digest::render(&report, &state.config.organization_name) else {
        return Ok(NotificationOutcome::skipped("No birthdays to report"));
    };

    let email = OutgoingEmail {
        from: state.config.sender.clone(),
        to: state.config.require_admin_email()?.to_string(),
        digest,
    };
    let email_id = state
        .mailer
        .send(&email)
        .context("handing off birthday email")?;

    Ok(NotificationOutcome {
        success: true,
        message: "Birthday notifications sent".to_string(),
        today_count,
        upcoming_count,
        email_id: Some(email_id),
    })
}

pub fn run_notification(state: &AppState, today: NaiveDate) -> anyhow::Result<NotificationOutcome> {
    let roster = state.load_roster()?;
    notify_roster(state, &roster, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{day, roster, state, ROSTER};

    #[test]
    fn test_sends_digest() {
        let dir = tempfile::tempdir().unwrap();
        let (state, mailer) = state(&dir, ROSTER, Some("admin@example.org"));

        let outcome = run_notification(&state, day(2024, 6, 1)).unwrap();
        assert_eq!(
            outcome,
            NotificationOutcome {
                success: true,
                message: "Birthday notifications sent".to_string(),
                today_count: 1,
                upcoming_count: 1,
                email_id: Some("msg-1".to_string()),
            }
        );

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "admin@example.org");
        assert_eq!(sent[0].digest.subject, "🎉 1 Birthday Today!");
    }

    #[test]
    fn test_quiet_day_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (state, mailer) = state(&dir, ROSTER, Some("admin@example.org"));

        let outcome = run_notification(&state, day(2024, 8, 1)).unwrap();
        assert_eq!(outcome, NotificationOutcome::skipped("No birthdays to report"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_roster() {
        let dir = tempfile::tempdir().unwrap();
        let (state, mailer) = state(&dir, "[]", None);

        let outcome = run_notification(&state, day(2024, 6, 1)).unwrap();
        assert_eq!(outcome.message, "No members to check");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_admin_email_fails_only_when_sending() {
        let dir = tempfile::tempdir().unwrap();
        let (state, mailer) = state(&dir, ROSTER, None);

        let quiet = notify_roster(&state, &roster(), day(2024, 8, 1)).unwrap();
        assert!(quiet.success);

        let err = notify_roster(&state, &roster(), day(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("ADMIN_EMAIL"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_lenient_import_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"id": "1", "full_name": "Ama Mensah", "date_of_birth": "1990-06-01", "phone": "1",
             "created_at": "2024-01-01", "updated_at": "2024-01-01"},
            {"id": "2", "full_name": "Broken", "date_of_birth": "not a date", "phone": "2",
             "created_at": "2024-01-01", "updated_at": "2024-01-01"}
        ]"#;
        let (state, mailer) = state(&dir, json, Some("admin@example.org"));

        let outcome = run_notification(&state, day(2024, 6, 1)).unwrap();
        assert_eq!(outcome.today_count, 1);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }
}
