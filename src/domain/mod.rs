//! Domain module containing core business logic and data types.
//!
//! This module defines the core entities (Habit, User) and the pure streak
//! calculator, along with the validation rules that gate habit creation.

pub mod habit;
pub mod streak;
pub mod types;
pub mod user;
pub mod validation;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use types::*;
pub use user::*;

use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// `Validation` carries every violated rule at once so callers can surface
/// them together instead of fixing one field at a time.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation failed: {}", .errors.join(", "))]
    Validation { errors: Vec<String> },

    #[error("habit not found: {habit_id}")]
    NotFound { habit_id: String },
}
