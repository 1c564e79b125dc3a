//! Streak calculation.
//!
//! The streak is a pure function of the completion history and "today"; the
//! value cached on a habit must always equal what this function returns for
//! the same inputs.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Count consecutive completed days ending at and including `today`.
///
/// Walks backward from `today` one calendar day at a time while each day is
/// present in `history`, stopping at the first gap. If `today` itself is
/// absent the streak is 0 - a run that ends yesterday is a broken streak,
/// not a current one.
///
/// `history` is a set, so duplicate days cannot occur. Each membership test
/// is O(log n) and the walk visits at most one day per history entry.
pub fn compute_streak(history: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while history.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break, // ran off the calendar
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_history_is_zero() {
        let history = BTreeSet::new();
        assert_eq!(compute_streak(&history, day("2025-03-10")), 0);
    }

    #[test]
    fn test_today_only_is_one() {
        let today = day("2025-03-10");
        let history = BTreeSet::from([today]);
        assert_eq!(compute_streak(&history, today), 1);
    }

    #[test]
    fn test_consecutive_run_counts_back_from_today() {
        let today = day("2025-03-10");
        let history = BTreeSet::from([
            today,
            today - Days::new(1),
            today - Days::new(2),
        ]);
        assert_eq!(compute_streak(&history, today), 3);
    }

    #[test]
    fn test_missing_today_breaks_streak() {
        let today = day("2025-03-10");
        let history = BTreeSet::from([today - Days::new(1), today - Days::new(2)]);
        assert_eq!(compute_streak(&history, today), 0);
    }

    #[test]
    fn test_gap_stops_the_walk() {
        let today = day("2025-03-10");
        let history = BTreeSet::from([
            today,
            today - Days::new(1),
            // 2025-03-08 missing
            today - Days::new(3),
            today - Days::new(4),
        ]);
        assert_eq!(compute_streak(&history, today), 2);
    }

    #[test]
    fn test_future_entries_do_not_count() {
        let today = day("2025-03-10");
        let history = BTreeSet::from([today, today + Days::new(1)]);
        assert_eq!(compute_streak(&history, today), 1);
    }
}
