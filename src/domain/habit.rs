//! Habit entity and completion transitions.
//!
//! This module defines the core Habit struct, the draft/patch inputs used by
//! the store commands, and the complete/uncomplete transitions that keep the
//! derived fields (streak, progress) consistent with the history set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{compute_streak, Category, Frequency, HabitId};

/// Display color assigned when a habit does not specify one.
pub const DEFAULT_COLOR: &str = "#007AFF";

/// A habit the user wants to do regularly.
///
/// `completion_history` is the permanent record: one entry per calendar day
/// the habit was completed, never duplicated. `streak` and `progress` are
/// caches derived from the history and counters; every transition recomputes
/// them so they are always recomputable from first principles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, immutable after creation
    pub id: HabitId,
    /// Display name (e.g., "Drink water", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Category for display grouping (health, productivity, ...)
    pub category: Category,
    /// Display color, no domain meaning
    pub color: String,
    /// How often this habit should be performed (display only)
    pub frequency: Frequency,
    /// Completions that count as "fully done" for progress purposes
    pub target_count: u32,
    /// Lifetime count of completion actions, never reset by rollover
    pub completed_count: u32,
    /// Whether the habit has been marked done for the current local day
    pub is_completed: bool,
    /// Distinct calendar days on which the habit was completed
    pub completion_history: BTreeSet<NaiveDate>,
    /// Consecutive-day count ending at today, derived from the history
    pub streak: u32,
    /// Percentage toward the target, clamped to 0..=100
    pub progress: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
}

/// Input for creating a habit.
///
/// Drafts are validated by `validation::validate_draft` before the store
/// turns them into a `Habit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub color: Option<String>,
    pub frequency: Frequency,
    #[serde(default = "default_target_count")]
    pub target_count: u32,
}

fn default_target_count() -> u32 {
    1
}

/// Partial update for an existing habit.
///
/// `None` leaves a field untouched; `description` is doubly optional so the
/// caller can clear it explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub color: Option<String>,
    pub frequency: Option<Frequency>,
    pub target_count: Option<u32>,
}

impl Habit {
    /// Build a habit from a validated draft.
    ///
    /// The draft must already have passed validation; this constructor only
    /// assigns the fresh id, the timestamps, and the zeroed counters.
    pub fn from_draft(draft: HabitDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: HabitId::new(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            color: draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            frequency: draft.frequency,
            target_count: draft.target_count,
            completed_count: 0,
            is_completed: false,
            completion_history: BTreeSet::new(),
            streak: 0,
            progress: 0,
            created_at: now,
            updated_at: now,
            last_completed_at: None,
        }
    }

    /// Produce the record this habit would become with `patch` applied.
    ///
    /// The merged candidate is re-validated before it replaces the original,
    /// so an invalid patch never mutates state. Progress is recomputed in
    /// case the target changed.
    pub fn merged(&self, patch: &HabitPatch) -> Self {
        let mut candidate = self.clone();

        if let Some(name) = &patch.name {
            candidate.name = name.clone();
        }
        if let Some(description) = &patch.description {
            candidate.description = description.clone();
        }
        if let Some(category) = &patch.category {
            candidate.category = category.clone();
        }
        if let Some(color) = &patch.color {
            candidate.color = color.clone();
        }
        if let Some(frequency) = patch.frequency {
            candidate.frequency = frequency;
        }
        if let Some(target_count) = patch.target_count {
            candidate.target_count = target_count;
        }

        candidate.progress = progress_for(candidate.completed_count, candidate.target_count);
        candidate
    }

    /// Mark the habit done for `today`.
    ///
    /// Adding an already-present day to the history is a set no-op, but the
    /// counters and flags still transition.
    pub fn complete(&mut self, today: NaiveDate, now: DateTime<Utc>) {
        self.completion_history.insert(today);
        self.is_completed = true;
        self.completed_count += 1;
        self.streak = compute_streak(&self.completion_history, today);
        self.progress = progress_for(self.completed_count, self.target_count);
        self.last_completed_at = Some(now);
        self.updated_at = now;
    }

    /// Undo today's completion.
    pub fn uncomplete(&mut self, today: NaiveDate, now: DateTime<Utc>) {
        self.completion_history.remove(&today);
        self.is_completed = false;
        self.completed_count = self.completed_count.saturating_sub(1);
        self.streak = compute_streak(&self.completion_history, today);
        self.progress = progress_for(self.completed_count, self.target_count);
        self.updated_at = now;
    }

    /// Whether the habit's history records a completion for `day`.
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completion_history.contains(&day)
    }
}

/// Percentage toward the target, truncated and clamped to 0..=100.
///
/// A zero target is treated as 1 so legacy records can never divide by zero.
pub fn progress_for(completed_count: u32, target_count: u32) -> u32 {
    let target = target_count.max(1) as u64;
    let pct = (completed_count as u64 * 100) / target;
    pct.min(100) as u32
}
