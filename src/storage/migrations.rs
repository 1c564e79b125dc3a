//! Migration of stored habit blobs.
//!
//! Older (or partially written) snapshots are rebuilt field by field, with a
//! documented default for anything missing or mistyped. Migration is total
//! over field content: it only fails when the blob or a habit record is not
//! a JSON object at all.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::domain::{progress_for, Category, Frequency, Habit, HabitId, DEFAULT_COLOR};
use crate::storage::{HabitsBlob, StorageError};

/// Current version tag written into every habit snapshot.
pub const SCHEMA_VERSION: &str = "1.0";

/// Rebuild a snapshot blob of any prior shape into the current one.
pub fn migrate_blob(value: &Value) -> Result<HabitsBlob, StorageError> {
    let root = value
        .as_object()
        .ok_or_else(|| StorageError::CorruptData("habits blob is not an object".to_string()))?;

    let mut habits = Vec::new();
    if let Some(Value::Array(items)) = root.get("habits") {
        habits.reserve(items.len());
        for raw in items {
            habits.push(migrate_habit(raw)?);
        }
    }

    let last_active_date = root
        .get("lastActiveDate")
        .and_then(Value::as_str)
        .and_then(parse_day);

    Ok(HabitsBlob {
        habits,
        last_active_date,
        version: SCHEMA_VERSION.to_string(),
        saved_at: None,
    })
}

/// Rebuild one habit record, defaulting every missing field.
fn migrate_habit(value: &Value) -> Result<Habit, StorageError> {
    let record = value
        .as_object()
        .ok_or_else(|| StorageError::CorruptData("habit record is not an object".to_string()))?;

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| HabitId::from_string(s).ok())
        .unwrap_or_default();

    let name = match record.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => "Unnamed Habit".to_string(),
    };

    let description = record
        .get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    let category = record
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_tag)
        .unwrap_or(Category::Other);

    let color = record
        .get("color")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_COLOR)
        .to_string();

    let frequency = record
        .get("frequency")
        .and_then(Value::as_str)
        .map(Frequency::from_tag)
        .unwrap_or(Frequency::Daily);

    let target_count = u32_field(record.get("targetCount"), 1).max(1);
    let completed_count = u32_field(record.get("completedCount"), 0);
    let is_completed = record
        .get("isCompleted")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    // Unparseable day entries are dropped rather than failing the whole
    // migration; the set semantics also deduplicate here.
    let completion_history: BTreeSet<NaiveDate> = match record.get("completionHistory") {
        Some(Value::Array(days)) => days
            .iter()
            .filter_map(Value::as_str)
            .filter_map(parse_day)
            .collect(),
        _ => BTreeSet::new(),
    };

    let streak = u32_field(record.get("streak"), 0);
    let progress = progress_for(completed_count, target_count);

    let now = Utc::now();
    let created_at = datetime_field(record.get("createdAt")).unwrap_or(now);
    let updated_at = datetime_field(record.get("updatedAt")).unwrap_or(now);
    let last_completed_at = datetime_field(record.get("lastCompletedAt"));

    Ok(Habit {
        id,
        name,
        description,
        category,
        color,
        frequency,
        target_count,
        completed_count,
        is_completed,
        completion_history,
        streak,
        progress,
        created_at,
        updated_at,
        last_completed_at,
    })
}

fn u32_field(value: Option<&Value>, default: u32) -> u32 {
    value
        .and_then(Value::as_u64)
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(default)
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    s.parse().ok()
}

fn datetime_field(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
