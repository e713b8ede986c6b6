use std::path::PathBuf;
use std::time::Duration;

use birthdays::{ImportMode, LeapDayPolicy, DEFAULT_UPCOMING_DAYS};
use chrono::FixedOffset;

const DEFAULT_SENDER: &str = "COP Macedonia Assembly <onboarding@resend.dev>";
const DEFAULT_ORGANIZATION: &str = "COP, Macedonia Assembly";
const DEFAULT_ROSTER_PATH: &str = "members.json";
const DEFAULT_NOTIFY_HOUR: u32 = 8;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Notifier configuration loaded from environment variables.
///
/// | Env Var              | Default                                          |
/// |----------------------|--------------------------------------------------|
/// | `ADMIN_EMAIL`        | none (required by `notify` and `watch`)          |
/// | `SENDER_EMAIL`       | `COP Macedonia Assembly <onboarding@resend.dev>` |
/// | `ORGANIZATION_NAME`  | `COP, Macedonia Assembly`                        |
/// | `ROSTER_PATH`        | `members.json`                                   |
/// | `ROSTER_IMPORT_MODE` | `lenient`                                        |
/// | `UPCOMING_DAYS`      | `7`                                              |
/// | `UTC_OFFSET_MINUTES` | `0`                                              |
/// | `OUTBOX_DIR`         | none (emails are only logged)                    |
/// | `NOTIFY_HOUR`        | `8`                                              |
/// | `POLL_INTERVAL_SECS` | `60`                                             |
/// | `LEAP_DAY_POLICY`    | `skip`                                           |
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub admin_email: Option<String>,
    pub sender: String,
    pub organization_name: String,
    pub roster_path: PathBuf,
    pub import_mode: ImportMode,
    pub upcoming_days: u32,
    /// Office timezone; "today" is the local date at this offset.
    pub utc_offset: FixedOffset,
    pub outbox_dir: Option<PathBuf>,
    /// Earliest local hour the daily run may send.
    pub notify_hour: u32,
    pub poll_interval: Duration,
    pub leap_day_policy: LeapDayPolicy,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let upcoming_days = parse_or(&var, "UPCOMING_DAYS", DEFAULT_UPCOMING_DAYS)?;

        let offset_minutes: i32 = parse_or(&var, "UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                var: "UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: "offset must be within ±24 hours".into(),
            })?;

        let notify_hour: u32 = parse_or(&var, "NOTIFY_HOUR", DEFAULT_NOTIFY_HOUR)?;
        if notify_hour > 23 {
            return Err(ConfigError::Invalid {
                var: "NOTIFY_HOUR",
                value: notify_hour.to_string(),
                reason: "hour must be 0-23".into(),
            });
        }

        let poll_secs: u64 = parse_or(&var, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "POLL_INTERVAL_SECS",
                value: "0".into(),
                reason: "interval must be positive".into(),
            });
        }

        let leap_day_policy = match var("LEAP_DAY_POLICY").as_deref() {
            None | Some("skip") => LeapDayPolicy::Skip,
            Some("feb28") => LeapDayPolicy::February28,
            Some("mar1") => LeapDayPolicy::March1,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LEAP_DAY_POLICY",
                    value: other.to_string(),
                    reason: "expected skip, feb28 or mar1".into(),
                })
            }
        };

        let import_mode = match var("ROSTER_IMPORT_MODE").as_deref() {
            None | Some("lenient") => ImportMode::Lenient,
            Some("strict") => ImportMode::Strict,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ROSTER_IMPORT_MODE",
                    value: other.to_string(),
                    reason: "expected lenient or strict".into(),
                })
            }
        };

        Ok(Self {
            admin_email: var("ADMIN_EMAIL"),
            sender: var("SENDER_EMAIL").unwrap_or_else(|| DEFAULT_SENDER.into()),
            organization_name: var("ORGANIZATION_NAME")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.into()),
            roster_path: var("ROSTER_PATH")
                .unwrap_or_else(|| DEFAULT_ROSTER_PATH.into())
                .into(),
            import_mode,
            upcoming_days,
            utc_offset,
            outbox_dir: var("OUTBOX_DIR").map(PathBuf::from),
            notify_hour,
            poll_interval: Duration::from_secs(poll_secs),
            leap_day_policy,
        })
    }

    pub fn require_admin_email(&self) -> Result<&str, ConfigError> {
        self.admin_email
            .as_deref()
            .ok_or(ConfigError::Missing("ADMIN_EMAIL"))
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
            value,
        }),
    }
}
