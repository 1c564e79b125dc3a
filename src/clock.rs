//! Injected time source.
//!
//! Every clock read in the store goes through this trait, so tests can pin
//! the calendar day and wall time instead of racing real midnight.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Source of the current instant and calendar day.
pub trait Clock: Send + Sync {
    /// Current instant, UTC. Stamps `createdAt`/`updatedAt`-style fields.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the device's local timezone. Day boundaries
    /// (rollover, streaks, completion history) all run against this day.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Deterministic clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Pin the clock to midnight UTC on the given day.
    pub fn on_day(today: NaiveDate) -> Self {
        let now = DateTime::from_naive_utc_and_offset(today.and_time(NaiveTime::MIN), Utc);
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_pinned() {
        let day: NaiveDate = "2025-03-10".parse().unwrap();
        let clock = FixedClock::on_day(day);

        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
        // repeated reads never drift
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), clock.today());
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let before = Utc::now();
        assert!(clock.now() >= before);
    }
}
