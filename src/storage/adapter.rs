//! Persistence adapter.
//!
//! Owns the keys, blob shapes, and version tag for everything the store
//! persists, and converts between domain records and the JSON blobs held by
//! the key-value backend. Versioning and migration live behind `load`; the
//! store never sees a stale shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{Habit, User};
use crate::storage::migrations::{self, SCHEMA_VERSION};
use crate::storage::{KeyValueStore, StorageError};

/// Key under which the habit snapshot blob is stored.
pub const HABITS_KEY: &str = "@habitify_habits";
/// Key under which the user profile blob is stored.
pub const USER_KEY: &str = "@habitify_user";

/// Persisted habit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitsBlob {
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    pub version: String,
    /// Write timestamp, metadata only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Adapter between the store and the key-value backend.
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the habit snapshot, migrating stale shapes in place.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Blobs whose
    /// version tag is stale, or that no longer deserialize directly, go
    /// through migration, which fills missing fields with defaults and only
    /// fails on fundamentally corrupt (non-object) data.
    pub async fn load(&self) -> Result<Option<HabitsBlob>, StorageError> {
        let Some(value) = self.store.get(HABITS_KEY).await? else {
            return Ok(None);
        };

        if value.get("version").and_then(Value::as_str) == Some(SCHEMA_VERSION) {
            match serde_json::from_value::<HabitsBlob>(value.clone()) {
                Ok(blob) => {
                    tracing::debug!(habits = blob.habits.len(), "loaded habit snapshot");
                    return Ok(Some(blob));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "current-version blob failed to deserialize, migrating");
                }
            }
        }

        let blob = migrations::migrate_blob(&value)?;
        tracing::info!(
            habits = blob.habits.len(),
            version = SCHEMA_VERSION,
            "migrated stored habit snapshot"
        );

        // Write the migrated shape back so the next load is direct.
        if let Err(e) = self.write_blob(&blob).await {
            tracing::warn!(error = %e, "failed to persist migrated snapshot");
        }

        Ok(Some(blob))
    }

    /// Persist the habit snapshot. One durability attempt per call.
    pub async fn save(
        &self,
        habits: &[Habit],
        last_active_date: Option<NaiveDate>,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let blob = HabitsBlob {
            habits: habits.to_vec(),
            last_active_date,
            version: SCHEMA_VERSION.to_string(),
            saved_at: Some(saved_at),
        };
        self.write_blob(&blob).await
    }

    async fn write_blob(&self, blob: &HabitsBlob) -> Result<(), StorageError> {
        let value = serde_json::to_value(blob)?;
        self.store.set(HABITS_KEY, value).await?;
        tracing::debug!(habits = blob.habits.len(), "saved habit snapshot");
        Ok(())
    }

    /// Load the stored user profile, if any.
    ///
    /// An unreadable profile is treated as absent; a broken user blob must
    /// not block startup.
    pub async fn load_user(&self) -> Result<Option<User>, StorageError> {
        let Some(value) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "stored user profile unreadable, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let value = serde_json::to_value(user)?;
        self.store.set(USER_KEY, value).await
    }

    /// Remove every key this adapter owns. Safe to call when nothing is
    /// stored.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.store.remove(HABITS_KEY).await?;
        self.store.remove(USER_KEY).await?;
        tracing::info!("cleared all persisted data");
        Ok(())
    }
}
