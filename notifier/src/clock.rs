//! Wall clock for the notifier
//!
//! The engine never reads the time itself; this is the one place "now" comes
//! from, so tests can swap in a fixed clock.

use std::sync::Mutex;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    /// Local wall-clock time in the office's timezone.
    fn now(&self) -> NaiveDateTime;

    /// `now` truncated to midnight.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// System time shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midnight on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::default()))
    }

    #[cfg(test)]
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    #[cfg(test)]
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
