//! Closed command type applied by the reducer.
//!
//! Commands are fully resolved before they reach the reducer: validation has
//! already happened and any clock reads are captured in the variant, so
//! applying a command is deterministic and cannot fail.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Habit, HabitId, User};

#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the collection with a loaded snapshot
    LoadSnapshot {
        habits: Vec<Habit>,
        last_active_date: Option<NaiveDate>,
        today: NaiveDate,
    },
    /// Append a freshly built habit
    AddHabit { habit: Habit },
    /// Replace an existing habit with its merged, re-validated record
    UpdateHabit { habit: Habit },
    DeleteHabit { id: HabitId },
    /// Flip the per-day completed flag, updating history and derived fields
    ToggleHabit {
        id: HabitId,
        today: NaiveDate,
        now: DateTime<Utc>,
    },
    /// Daily rollover: clear per-day flags without touching history
    ResetDailyProgress { today: NaiveDate },
    /// Stamp the day a snapshot is being persisted on
    MarkActive { today: NaiveDate },
    SetUser { user: User },
    SetLoading { loading: bool },
    SetError { message: String },
    ClearError,
    /// Reset the whole state to its defaults
    Logout,
}
