mod clock;
mod commands;
mod config;
mod digest;
mod mailer;
mod scheduler;
mod state;

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clock::{Clock, FixedClock, SystemClock};
use config::NotifierConfig;
use mailer::{LogMailer, Mailer, OutboxMailer};
use state::{AppState, RosterSource};

#[derive(Parser, Debug)]
#[command(
    name = "birthday-notifier",
    version,
    about = "Church member birthday reminders"
)]
struct Cli {
    /// Roster JSON file, or `-` for stdin (overrides ROSTER_PATH)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// The member directory, in name order
    Members {
        /// Only members whose name, phone or email contains this (any case)
        #[arg(long)]
        search: Option<String>,
    },
    /// Members celebrating today
    Today,
    /// Birthdays in the next few days, soonest first
    Upcoming {
        /// Window length in days (defaults to UPCOMING_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },
    /// One member's birthday details
    Member { id: String },
    /// Headline counts
    Summary,
    /// Send today's digest once
    Notify,
    /// Send the digest every day at NOTIFY_HOUR
    Watch,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    birthdays::parse_date(value).map_err(|e| e.to_string())
}

fn emit<T: Serialize + Display>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{value}");
    }
    Ok(())
}

fn build_state(cli: &Cli, config: NotifierConfig) -> anyhow::Result<AppState> {
    let mailer: Arc<dyn Mailer> = match &config.outbox_dir {
        Some(dir) => Arc::new(
            OutboxMailer::new(dir)
                .with_context(|| format!("creating outbox {}", dir.display()))?,
        ),
        None => Arc::new(LogMailer),
    };

    let clock: Arc<dyn Clock> = match cli.date {
        Some(date) => Arc::new(FixedClock::at_date(date)),
        None => Arc::new(SystemClock::new(config.utc_offset)),
    };

    let roster_source =
        RosterSource::from_arg(cli.roster.clone().unwrap_or_else(|| config.roster_path.clone()));

    Ok(AppState {
        config,
        clock,
        mailer,
        roster_source,
    })
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "birthday_notifier=info,birthdays=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = NotifierConfig::from_env().context("loading configuration")?;
    let state = build_state(&cli, config)?;
    let today = state.clock.today();

    match &cli.command {
        Command::Members { search } => emit(
            &commands::people::members(&state, today, search.as_deref())?,
            cli.json,
        ),
        Command::Today => emit(&commands::people::today(&state, today)?, cli.json),
        Command::Upcoming { days } => {
            emit(&commands::people::upcoming(&state, today, *days)?, cli.json)
        }
        Command::Member { id } => emit(&commands::people::member(&state, today, id)?, cli.json),
        Command::Summary => emit(&commands::statistics::summary(&state, today)?, cli.json),
        Command::Notify => {
            let outcome = commands::notify::run_notification(&state, today)?;
            emit(&outcome, cli.json)
        }
        Command::Watch => {
            info!(hour = state.config.notify_hour, "watching for birthdays");
            commands::calendar::watch(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "birthday-notifier",
            "upcoming",
            "--days",
            "14",
            "--date",
            "2024-12-30",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 12, 30));
        assert!(matches!(cli.command, Command::Upcoming { days: Some(14) }));
    }

    #[test]
    fn test_cli_members_search() {
        let cli = Cli::try_parse_from(["birthday-notifier", "members", "--search", "kofi"]).unwrap();
        assert!(matches!(cli.command, Command::Members { search: Some(ref term) } if term == "kofi"));

        let cli = Cli::try_parse_from(["birthday-notifier", "members"]).unwrap();
        assert!(matches!(cli.command, Command::Members { search: None }));
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["birthday-notifier", "today", "--date", "Invalid Date"]).is_err());
    }

    #[test]
    fn test_date_flag_pins_the_clock() {
        let cli = Cli::try_parse_from(["birthday-notifier", "--date", "2024-06-01", "summary"]).unwrap();
        let state = build_state(&cli, commands::testing::config(None)).unwrap();
        assert_eq!(state.clock.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(state.roster_source, RosterSource::File("members.json".into()));
    }
}
