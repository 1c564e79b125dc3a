//! Habit state-and-streak engine.
//!
//! This crate is the core of a habit-tracking app: a reducer-driven store
//! that owns habit records, completion history, streak computation, daily
//! rollover, and the persistence contract with on-device key-value storage.
//! Presentation, navigation, and real authentication live outside and talk
//! to [`HabitStore`] through its commands and read-only snapshot.

use thiserror::Error;

// Internal modules
mod clock;
mod domain;
mod storage;
mod store;

// Re-export public modules and types
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::*;
pub use storage::{
    FileStore, HabitsBlob, KeyValueStore, MemoryStore, PersistenceAdapter, StorageError,
    HABITS_KEY, USER_KEY,
};
pub use store::{HabitStore, Statistics, StoreSnapshot};

/// Errors surfaced by store commands.
///
/// Domain failures (validation, unknown ids) are recoverable and never
/// mutate state; storage failures on the save path are logged instead of
/// surfaced, so callers mostly see these from logout and explicit loads.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("domain error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
