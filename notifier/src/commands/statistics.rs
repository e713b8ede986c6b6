use chrono::NaiveDate;

use crate::state::{AppState, SummaryView};

pub fn summary(state: &AppState, today: NaiveDate) -> anyhow::Result<SummaryView> {
    let roster = state.load_roster()?;
    Ok(SummaryView(roster.summary(today, state.config.upcoming_days)))
}
