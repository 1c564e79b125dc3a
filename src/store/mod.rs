//! Habit store: the core state engine.
//!
//! The store owns the authoritative in-memory state and is its only writer.
//! Public methods validate input, resolve the clock, and funnel every
//! transition through the reducer as a single command, then persist the
//! resulting state best-effort. Commands take `&mut self`, so application is
//! serialized by construction and no observer ever sees a partial update.

pub mod command;
pub mod rollover;
pub mod state;

pub use state::{AppState, Statistics, StoreSnapshot};

use std::sync::Arc;

use crate::clock::Clock;
use crate::domain::{validation, Credentials, DomainError, Habit, HabitDraft, HabitId, HabitPatch, User};
use crate::storage::{KeyValueStore, PersistenceAdapter, StorageError};
use crate::StoreError;

use command::Command;
use rollover::rollover_due;

/// Reducer-driven habit store backed by a key-value persistence adapter.
pub struct HabitStore {
    state: AppState,
    adapter: PersistenceAdapter,
    clock: Arc<dyn Clock>,
}

impl HabitStore {
    /// Create an empty store over the given backend and clock.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: AppState::default(),
            adapter: PersistenceAdapter::new(store),
            clock,
        }
    }

    /// Create a store and load persisted state into it.
    ///
    /// Never fails: a corrupt snapshot falls back to an empty state and a
    /// backend failure surfaces through the `error` flag.
    pub async fn open(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let mut this = Self::new(store, clock);
        this.load().await;
        this
    }

    /// Load habits and user from the persistence adapter, then apply the
    /// daily rollover policy.
    pub async fn load(&mut self) {
        self.state.apply(Command::SetLoading { loading: true });
        let today = self.clock.today();

        match self.adapter.load().await {
            Ok(Some(blob)) => {
                tracing::info!(habits = blob.habits.len(), "loaded persisted habits");
                self.state.apply(Command::LoadSnapshot {
                    habits: blob.habits,
                    last_active_date: blob.last_active_date,
                    today,
                });
            }
            Ok(None) => {
                self.state.apply(Command::LoadSnapshot {
                    habits: Vec::new(),
                    last_active_date: None,
                    today,
                });
            }
            Err(StorageError::CorruptData(reason)) => {
                tracing::warn!(%reason, "stored snapshot corrupt, starting from empty state");
                self.state.apply(Command::LoadSnapshot {
                    habits: Vec::new(),
                    last_active_date: None,
                    today,
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load habits");
                self.state.apply(Command::SetError {
                    message: "Failed to load habits".to_string(),
                });
            }
        }

        match self.adapter.load_user().await {
            Ok(Some(user)) => self.state.apply(Command::SetUser { user }),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to load user profile"),
        }

        self.activate().await;
    }

    /// Apply the daily rollover policy if the calendar day has changed.
    ///
    /// Called from `load`; hosts should also call it when the app returns to
    /// the foreground.
    pub async fn activate(&mut self) {
        let today = self.clock.today();
        if rollover_due(self.state.last_active_date, today) {
            tracing::info!(%today, "daily rollover: resetting per-day completion flags");
            self.state.apply(Command::ResetDailyProgress { today });
            self.persist().await;
        }
    }

    /// Create a habit from a draft. Returns the new habit's id.
    pub async fn add_habit(&mut self, draft: HabitDraft) -> Result<HabitId, StoreError> {
        if let Err(e) = validation::validate_draft(&draft) {
            return Err(self.command_failed(e));
        }

        let habit = Habit::from_draft(draft, self.clock.now());
        let id = habit.id.clone();
        tracing::debug!(habit = %id, name = %habit.name, "adding habit");

        self.state.apply(Command::AddHabit { habit });
        self.persist().await;
        Ok(id)
    }

    /// Merge a patch onto an existing habit, re-validating the result.
    pub async fn update_habit(&mut self, id: &HabitId, patch: HabitPatch) -> Result<(), StoreError> {
        let existing = self.state.habits.iter().find(|h| &h.id == id).cloned();
        let Some(existing) = existing else {
            return Err(self.command_failed(DomainError::NotFound {
                habit_id: id.to_string(),
            }));
        };

        let mut merged = existing.merged(&patch);
        if let Err(e) = validation::validate_habit(&merged) {
            return Err(self.command_failed(e));
        }
        merged.updated_at = self.clock.now();

        self.state.apply(Command::UpdateHabit { habit: merged });
        self.persist().await;
        Ok(())
    }

    /// Delete a habit. Deleting an unknown id is a no-op, not an error.
    pub async fn delete_habit(&mut self, id: &HabitId) -> Result<(), StoreError> {
        self.state.apply(Command::DeleteHabit { id: id.clone() });
        self.persist().await;
        Ok(())
    }

    /// Flip a habit's per-day completed flag. Returns the new flag value.
    pub async fn toggle_habit(&mut self, id: &HabitId) -> Result<bool, StoreError> {
        let will_complete = self
            .state
            .habits
            .iter()
            .find(|h| &h.id == id)
            .map(|h| !h.is_completed);
        let Some(will_complete) = will_complete else {
            return Err(self.command_failed(DomainError::NotFound {
                habit_id: id.to_string(),
            }));
        };

        self.state.apply(Command::ToggleHabit {
            id: id.clone(),
            today: self.clock.today(),
            now: self.clock.now(),
        });
        self.persist().await;
        Ok(will_complete)
    }

    /// Simulated sign-in; gated by the email validation rules.
    pub async fn sign_in(&mut self, credentials: Credentials) -> Result<(), StoreError> {
        self.state.apply(Command::SetLoading { loading: true });

        if let Err(e) = validation::validate_email(&credentials.email) {
            return Err(self.command_failed(e));
        }

        let user = User::from_credentials(&credentials, self.clock.now());
        tracing::info!(email = %user.email, "signed in");
        self.state.apply(Command::SetUser { user: user.clone() });
        if let Err(e) = self.adapter.save_user(&user).await {
            tracing::warn!(error = %e, "failed to persist user profile");
        }

        self.state.apply(Command::SetLoading { loading: false });
        Ok(())
    }

    /// Simulated sign-up; gated by the email and password rules.
    pub async fn sign_up(&mut self, credentials: Credentials) -> Result<(), StoreError> {
        self.state.apply(Command::SetLoading { loading: true });

        if let Err(e) = validation::validate_sign_up(&credentials.email, &credentials.password) {
            return Err(self.command_failed(e));
        }

        let user = User::from_credentials(&credentials, self.clock.now());
        tracing::info!(email = %user.email, "signed up");
        self.state.apply(Command::SetUser { user: user.clone() });
        if let Err(e) = self.adapter.save_user(&user).await {
            tracing::warn!(error = %e, "failed to persist user profile");
        }

        self.state.apply(Command::SetLoading { loading: false });
        Ok(())
    }

    /// Clear all persisted data and reset the state to its defaults.
    ///
    /// Unlike saves, a storage failure here fails the command: logging out
    /// must not leave another user's data on the device.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.adapter.clear_all().await {
            return Err(self.command_failed(e));
        }
        self.state.apply(Command::Logout);
        Ok(())
    }

    /// Clear a surfaced error without touching anything else.
    pub fn clear_error(&mut self) {
        self.state.apply(Command::ClearError);
    }

    /// Aggregate statistics over the current collection. Pure query.
    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.state.habits, self.clock.today())
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            habits: self.state.habits.clone(),
            user: self.state.user.clone(),
            is_authenticated: self.state.user.is_some(),
            loading: self.state.loading,
            error: self.state.error.clone(),
            statistics: self.statistics(),
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.state.habits.iter().find(|h| &h.id == id)
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.user.is_some()
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn total_habits(&self) -> u32 {
        self.state.total_habits
    }

    pub fn completed_today(&self) -> u32 {
        self.state.completed_today
    }

    pub fn last_active_date(&self) -> Option<chrono::NaiveDate> {
        self.state.last_active_date
    }

    /// Record a failure on the session state and hand it back to the caller.
    fn command_failed<E: Into<StoreError>>(&mut self, err: E) -> StoreError {
        let err = err.into();
        self.state.apply(Command::SetError {
            message: err.to_string(),
        });
        err
    }

    /// Persist the current state, stamping today as the last active day.
    ///
    /// Saves are best-effort: a failed write is logged and the in-memory
    /// state stands. Because commands are serialized through `&mut self`,
    /// writes reach the adapter in command order and the latest state is
    /// always the last one written.
    async fn persist(&mut self) {
        let today = self.clock.today();
        self.state.apply(Command::MarkActive { today });
        if let Err(e) = self
            .adapter
            .save(&self.state.habits, Some(today), self.clock.now())
            .await
        {
            tracing::warn!(error = %e, "failed to persist habits; keeping in-memory state");
        }
    }
}
