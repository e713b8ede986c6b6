//! Error types for the birthday engine

/// Errors surfaced by the engine and its roster persistence.
///
/// `InvalidDate` is the only kind the date arithmetic itself produces. The
/// remaining variants come from reading or writing roster snapshots and are
/// passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum BirthdayError {
    #[error("Invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Unsupported roster version: {0}")]
    UnsupportedVersion(u8),

    #[error("Roster JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Roster I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BirthdayError {
    pub(crate) fn invalid_date(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BirthdayError>;
