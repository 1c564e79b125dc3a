//! Daily rollover policy.
//!
//! On activation the store checks whether the calendar day has changed since
//! it was last active; if so, every habit's per-day completed flag resets so
//! `is_completed` always means "done today". Completion history, lifetime
//! counts, and streak records are untouched by rollover.

use chrono::NaiveDate;

/// Whether a rollover is due.
///
/// A store that has never been active (`None`) is treated as already on
/// today's date: the first run is not a rollover.
pub fn rollover_due(last_active_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_active_date {
        Some(last_active) => last_active != today,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_day_change_triggers_rollover() {
        let today: NaiveDate = "2025-03-10".parse().unwrap();
        assert!(rollover_due(Some(today - Days::new(1)), today));
        assert!(rollover_due(Some(today + Days::new(1)), today));
    }

    #[test]
    fn test_same_day_is_not_due() {
        let today: NaiveDate = "2025-03-10".parse().unwrap();
        assert!(!rollover_due(Some(today), today));
    }

    #[test]
    fn test_first_run_is_not_a_rollover() {
        let today: NaiveDate = "2025-03-10".parse().unwrap();
        assert!(!rollover_due(None, today));
    }
}
