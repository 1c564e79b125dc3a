//! Authoritative store state and the reducer that advances it.
//!
//! Each command is applied in full before the next; observers only ever see
//! the state between commands, never mid-transition.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{compute_streak, Habit, User};
use crate::store::command::Command;

/// The store's snapshot of everything the app knows.
///
/// `total_habits` and `completed_today` are cached aggregates and must stay
/// recomputable from `habits`; the reducer maintains them on every
/// transition. `loading` and `error` are transient UI-facing flags and are
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub habits: Vec<Habit>,
    pub user: Option<User>,
    pub last_active_date: Option<NaiveDate>,
    pub loading: bool,
    pub error: Option<String>,
    pub total_habits: u32,
    pub completed_today: u32,
}

impl AppState {
    /// Apply one command, replacing the state atomically.
    ///
    /// Matching is exhaustive over the closed command set; adding a variant
    /// without handling it here is a compile error.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::LoadSnapshot {
                mut habits,
                last_active_date,
                today,
            } => {
                // The cached streak is only trustworthy for the day it was
                // written; rederive it for today before anyone reads it.
                for habit in &mut habits {
                    habit.streak = compute_streak(&habit.completion_history, today);
                }
                self.total_habits = habits.len() as u32;
                self.completed_today =
                    habits.iter().filter(|h| h.completed_on(today)).count() as u32;
                self.habits = habits;
                self.last_active_date = last_active_date;
                self.loading = false;
                self.error = None;
            }

            Command::AddHabit { habit } => {
                self.habits.push(habit);
                self.total_habits += 1;
                self.error = None;
            }

            Command::UpdateHabit { habit } => {
                if let Some(existing) = self.habits.iter_mut().find(|h| h.id == habit.id) {
                    *existing = habit;
                }
                self.error = None;
            }

            Command::DeleteHabit { id } => {
                let before = self.habits.len();
                self.habits.retain(|h| h.id != id);
                if self.habits.len() < before {
                    self.total_habits = self.total_habits.saturating_sub(1);
                }
                self.error = None;
            }

            Command::ToggleHabit { id, today, now } => {
                if let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) {
                    if habit.is_completed {
                        habit.uncomplete(today, now);
                        self.completed_today = self.completed_today.saturating_sub(1);
                    } else {
                        habit.complete(today, now);
                        self.completed_today += 1;
                    }
                }
                self.error = None;
            }

            Command::ResetDailyProgress { today } => {
                // History, lifetime counts, and streaks are permanent
                // records; only the per-day flag resets.
                for habit in &mut self.habits {
                    habit.is_completed = false;
                }
                self.completed_today = 0;
                self.last_active_date = Some(today);
            }

            Command::MarkActive { today } => {
                self.last_active_date = Some(today);
            }

            Command::SetUser { user } => {
                self.user = Some(user);
                self.error = None;
            }

            Command::SetLoading { loading } => {
                self.loading = loading;
            }

            Command::SetError { message } => {
                self.error = Some(message);
                self.loading = false;
            }

            Command::ClearError => {
                self.error = None;
            }

            Command::Logout => {
                *self = AppState::default();
            }
        }
    }
}

/// Aggregate statistics over the current habit collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_habits: u32,
    pub completed_today: u32,
    /// Share of habits completed today, rounded to a whole percent
    pub completion_rate: u32,
    pub longest_streak: u32,
}

impl Statistics {
    /// Pure query; counts completions straight from the history sets.
    pub fn compute(habits: &[Habit], today: NaiveDate) -> Self {
        let total_habits = habits.len() as u32;
        let completed_today = habits.iter().filter(|h| h.completed_on(today)).count() as u32;
        let completion_rate = if total_habits == 0 {
            0
        } else {
            ((completed_today as f64 / total_habits as f64) * 100.0).round() as u32
        };
        let longest_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);

        Self {
            total_habits,
            completed_today,
            completion_rate,
            longest_streak,
        }
    }
}

/// Read-only view handed to the presentation layer after every command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub habits: Vec<Habit>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub statistics: Statistics,
}
