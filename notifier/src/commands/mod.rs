pub mod calendar;
pub mod notify;
pub mod people;
pub mod statistics;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use birthdays::{ImportMode, LeapDayPolicy, Roster};
    use chrono::{FixedOffset, NaiveDate};

    use crate::clock::FixedClock;
    use crate::config::NotifierConfig;
    use crate::mailer::{MailError, Mailer, OutgoingEmail};
    use crate::state::{AppState, RosterSource};

    pub(crate) const ROSTER: &str = r#"[
        {"id": "1", "full_name": "Ama Mensah", "date_of_birth": "1990-06-01", "phone": "024-111",
         "email": "ama@example.org", "created_at": "2024-01-01", "updated_at": "2024-01-01"},
        {"id": "2", "full_name": "Kofi Boateng", "date_of_birth": "1985-06-05", "phone": "024-222",
         "created_at": "2024-01-01", "updated_at": "2024-01-01"},
        {"id": "3", "full_name": "Esi Owusu", "date_of_birth": "2000-11-20", "phone": "024-333",
         "created_at": "2024-01-01", "updated_at": "2024-01-01"}
    ]"#;

    /// Keeps every email it is handed.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(email.clone());
            Ok(format!("msg-{}", sent.len()))
        }
    }

    pub(crate) fn config(admin_email: Option<&str>) -> NotifierConfig {
        NotifierConfig {
            admin_email: admin_email.map(str::to_string),
            sender: "Church Office <office@example.org>".to_string(),
            organization_name: "COP, Macedonia Assembly".to_string(),
            roster_path: "members.json".into(),
            import_mode: ImportMode::Lenient,
            upcoming_days: 7,
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            outbox_dir: None,
            notify_hour: 8,
            poll_interval: std::time::Duration::from_secs(60),
            leap_day_policy: LeapDayPolicy::Skip,
        }
    }

    pub(crate) fn state(
        dir: &tempfile::TempDir,
        roster_json: &str,
        admin_email: Option<&str>,
    ) -> (AppState, Arc<RecordingMailer>) {
        let path = dir.path().join("members.json");
        std::fs::write(&path, roster_json).unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState {
            config: config(admin_email),
            clock: Arc::new(FixedClock::at_date(day(2024, 6, 1))),
            mailer: mailer.clone(),
            roster_source: RosterSource::File(path),
        };
        (state, mailer)
    }

    pub(crate) fn roster() -> Roster {
        Roster::import_json(ROSTER, ImportMode::Strict).unwrap().roster
    }

    pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
