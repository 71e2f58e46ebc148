//! Time source seam.
//!
//! The engine never reads the system clock directly; calendar days are the UTC
//! date of the clock's instant.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cell::Cell;

pub trait Clock {
    /// Current instant in Unix epoch milliseconds.
    fn now_ms(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or(DateTime::UNIX_EPOCH)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for hosts that replay events and for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    /// Starts at midday UTC of `day`.
    pub fn at_day(day: NaiveDate) -> Self {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .map(|value| value.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self::new(noon)
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_ms(Duration::days(days).num_milliseconds());
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}
