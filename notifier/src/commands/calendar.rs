use std::sync::Arc;

use tracing::{error, info};

use crate::commands::notify::run_notification;
use crate::scheduler::{DailySchedule, NotifyRunner};
use crate::state::AppState;

/// Run the notification once a day until the process is killed.
pub fn watch(state: AppState) -> anyhow::Result<()> {
    let state = Arc::new(state);
    let schedule = DailySchedule {
        send_hour: state.config.notify_hour,
        poll_interval: state.config.poll_interval,
    };
    // Fail fast instead of on the first birthday.
    state.config.require_admin_email()?;

    let clock = Arc::clone(&state.clock);
    let job_state = Arc::clone(&state);

    let mut runner = NotifyRunner::new();
    runner.start(clock, schedule, move |today| {
        match run_notification(&job_state, today) {
            Ok(outcome) => info!(
                message = %outcome.message,
                today = outcome.today_count,
                upcoming = outcome.upcoming_count,
                "daily birthday run finished"
            ),
            Err(e) => error!(error = %format!("{e:#}"), "daily birthday run failed"),
        }
    });

    runner.wait();
    Ok(())
}
