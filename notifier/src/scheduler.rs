//! Notify Runner - background thread that fires the birthday run once a day

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::clock::Clock;

/// When the daily run is allowed to fire.
///
/// The last run date lives only in the runner thread. A runner started after
/// `send_hour` fires for the current day straight away, so restarting `watch`
/// late in the day sends that day's digest a second time.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    /// Earliest local hour (0-23) for the run.
    pub send_hour: u32,
    /// How often the clock is checked.
    pub poll_interval: Duration,
}

impl DailySchedule {
    /// Due once the send hour has passed on a day that has not run yet.
    pub fn is_due(&self, now: NaiveDateTime, last_run: Option<NaiveDate>) -> bool {
        now.hour() >= self.send_hour && last_run.map_or(true, |day| day < now.date())
    }
}

/// Runner that owns the background polling thread
pub struct NotifyRunner {
    is_running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl NotifyRunner {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start polling `clock`; `job` receives the local date each time the run is due.
    pub fn start<F>(&mut self, clock: Arc<dyn Clock>, schedule: DailySchedule, mut job: F)
    where
        F: FnMut(NaiveDate) + Send + 'static,
    {
        if self.is_running.load(Ordering::Relaxed) {
            warn!("notify runner already running");
            return;
        }

        info!(
            send_hour = schedule.send_hour,
            poll_ms = schedule.poll_interval.as_millis() as u64,
            "starting notify runner"
        );
        self.is_running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.is_running);

        let handle = thread::spawn(move || {
            let mut last_run: Option<NaiveDate> = None;

            while running.load(Ordering::Relaxed) {
                let now = clock.now();
                if schedule.is_due(now, last_run) {
                    debug!(date = %now.date(), "daily birthday run due");
                    job(now.date());
                    last_run = Some(now.date());
                }

                // stop() unparks us early.
                thread::park_timeout(schedule.poll_interval);
            }
            info!("notify runner thread stopped");
        });

        self.thread_handle = Some(handle);
    }

    /// Stop polling and wait for the thread to exit.
    pub fn stop(&mut self) {
        if !self.is_running.load(Ordering::Relaxed) {
            return;
        }

        info!("stopping notify runner");
        self.is_running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.thread_handle.take() {
            handle.thread().unpark();
            let _ = handle.join(); // A panicked job has already been reported by the panic hook
        }
    }

    /// Block until the runner thread exits.
    pub fn wait(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.is_running.store(false, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}

impl Default for NotifyRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NotifyRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
