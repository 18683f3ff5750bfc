//! Cancellable scheduled tasks driven by an injectable clock
//!
//! Nothing here spawns threads or timers: the event loop polls the tasks
//! with the current time, so tests can drive them with [`FakeClock`].

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Source of monotonic and wall-clock time
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests
#[cfg(test)]
#[derive(Debug)]
pub struct FakeClock {
    inner: std::sync::Mutex<(Instant, DateTime<Utc>)>,
}

#[cfg(test)]
impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: std::sync::Mutex::new((Instant::now(), start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.0 += by;
        inner.1 += chrono::Duration::from_std(by).unwrap();
    }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap().0
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap().1
    }
}

/// A one-shot or periodic deadline with a single owner
#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    deadline: Option<Instant>,
    period: Option<Duration>,
}

impl ScheduledTask {
    /// Periodic task whose first run is one period after `now`.
    /// A period too long to represent never fires.
    pub fn every(period: Duration, now: Instant) -> Self {
        Self {
            deadline: now.checked_add(period),
            period: Some(period),
        }
    }

    /// Arm (or re-arm, superseding the pending deadline) a one-shot run
    pub fn schedule_after(&mut self, delay: Duration, now: Instant) {
        self.deadline = now.checked_add(delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true once per elapsed deadline. Periodic tasks re-arm from
    /// `now`, so a long stall does not cause a burst of catch-up runs.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = self.period.and_then(|p| now.checked_add(p));
                true
            }
            _ => false,
        }
    }
}

/// Delays per-keystroke work until edits pause
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    task: ScheduledTask,
    pending: Option<String>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            task: ScheduledTask::default(),
            pending: None,
        }
    }

    /// Record an edit; a newer edit replaces any pending one
    pub fn touch(&mut self, key: &str, now: Instant) {
        self.pending = Some(key.to_string());
        self.task.schedule_after(self.delay, now);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.task.cancel();
    }

    /// Key whose quiet period has elapsed, if any
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.task.fire_if_due(now) {
            self.pending.take()
        } else {
            None
        }
    }
}
