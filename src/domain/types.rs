//! Core types and enums used throughout the domain layer.
//!
//! This module defines the fundamental types like Category, Frequency, and
//! the HabitId wrapper used by Habit and the store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a habit.
///
/// This is a wrapper around UUID to provide type safety - you can't
/// accidentally pass some other id where a habit ID is expected. A random
/// UUID also keeps ids unique across every habit ever issued in a process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful when loading persisted data).
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Categories for organizing habits into different life areas.
///
/// Categories only drive display grouping and icon lookup; no core invariant
/// depends on them, so unknown stored values survive as `Custom`.
///
/// On the wire a category is always a bare string tag (`"health"`,
/// `"gardening"`), matching how stored blobs have always recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Health,
    Productivity,
    Mindfulness,
    Learning,
    Fitness,
    Creativity,
    Social,
    Other,
    /// User-defined category with a custom name
    Custom(String),
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &str {
        match self {
            Category::Health => "Health",
            Category::Productivity => "Productivity",
            Category::Mindfulness => "Mindfulness",
            Category::Learning => "Learning",
            Category::Fitness => "Fitness",
            Category::Creativity => "Creativity",
            Category::Social => "Social",
            Category::Other => "Other",
            Category::Custom(name) => name,
        }
    }

    /// The string tag this category is stored under.
    pub fn tag(&self) -> &str {
        match self {
            Category::Health => "health",
            Category::Productivity => "productivity",
            Category::Mindfulness => "mindfulness",
            Category::Learning => "learning",
            Category::Fitness => "fitness",
            Category::Creativity => "creativity",
            Category::Social => "social",
            Category::Other => "other",
            Category::Custom(name) => name,
        }
    }

    /// Parse a stored category tag. Unknown tags are preserved as custom
    /// categories rather than rejected; the set is open by design.
    pub fn from_tag(s: &str) -> Self {
        let tag = s.trim();
        match tag.to_lowercase().as_str() {
            "health" => Category::Health,
            "productivity" => Category::Productivity,
            "mindfulness" => Category::Mindfulness,
            "learning" => Category::Learning,
            "fitness" => Category::Fitness,
            "creativity" => Category::Creativity,
            "social" => Category::Social,
            "other" => Category::Other,
            "" => Category::Other,
            _ => Category::Custom(tag.to_string()),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Category::from_tag(&tag))
    }
}

/// How often a habit should be performed.
///
/// Frequency informs the display text and the creation-time target bounds;
/// streak and day tracking always run against calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Get the display name for this frequency.
    pub fn display_name(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Parse a stored frequency tag, defaulting to daily for anything
    /// unrecognized (the migration default).
    pub fn from_tag(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Daily,
        }
    }

    /// Largest sensible target count for this frequency.
    pub fn max_target(&self) -> u32 {
        match self {
            Frequency::Daily => 50,
            Frequency::Weekly => 100,
            Frequency::Monthly => 500,
        }
    }
}
