//! Persistence adapter tests: round-trips, migration, corrupt-data fallback,
//! and the best-effort save policy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use habitify_core::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("habitify_core=debug")
        .with_test_writer()
        .try_init();
}

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn clock_on(s: &str) -> Arc<FixedClock> {
    Arc::new(FixedClock::on_day(day(s)))
}

fn draft(name: &str, target_count: u32) -> HabitDraft {
    HabitDraft {
        name: name.to_string(),
        description: Some("test habit".to_string()),
        category: Category::Productivity,
        color: Some("#34C759".to_string()),
        frequency: Frequency::Daily,
        target_count,
    }
}

#[tokio::test]
async fn test_save_load_round_trip_is_semantically_equal() {
    init_logging();
    let backend: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let adapter = PersistenceAdapter::new(backend.clone());

    let now = Utc::now();
    let mut habit = Habit::from_draft(draft("Read", 3), now);
    habit.category = Category::Custom("book club".to_string());
    habit.complete(day("2025-03-09"), now);
    habit.complete(day("2025-03-10"), now);
    let habits = vec![habit, Habit::from_draft(draft("Meditate", 1), now)];

    adapter
        .save(&habits, Some(day("2025-03-10")), now)
        .await
        .unwrap();

    let blob = adapter.load().await.unwrap().unwrap();
    assert_eq!(blob.habits, habits);
    assert_eq!(blob.last_active_date, Some(day("2025-03-10")));

    // categories are stored as plain string tags, custom ones included
    let stored = backend.get(HABITS_KEY).await.unwrap().unwrap();
    assert_eq!(stored["habits"][0]["category"], json!("book club"));
    assert_eq!(stored["habits"][1]["category"], json!("productivity"));
}

#[tokio::test]
async fn test_load_on_empty_backend_is_none() {
    let adapter = PersistenceAdapter::new(Arc::new(MemoryStore::new()));
    assert!(adapter.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_stale_version_is_migrated_and_rewritten() {
    init_logging();
    let backend: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    backend
        .set(
            HABITS_KEY,
            json!({
                "version": "0.9",
                "lastActiveDate": "2025-03-09",
                "habits": [{ "name": "Meditate", "targetCount": 2, "completedCount": 1 }],
            }),
        )
        .await
        .unwrap();

    let adapter = PersistenceAdapter::new(backend.clone());
    let blob = adapter.load().await.unwrap().unwrap();

    assert_eq!(blob.habits.len(), 1);
    let habit = &blob.habits[0];
    assert_eq!(habit.name, "Meditate");
    assert_eq!(habit.target_count, 2);
    assert_eq!(habit.progress, 50);
    assert_eq!(habit.streak, 0);
    assert_eq!(habit.color, DEFAULT_COLOR);
    assert_eq!(blob.last_active_date, Some(day("2025-03-09")));

    // the migrated shape was written back under the current version
    let stored = backend.get(HABITS_KEY).await.unwrap().unwrap();
    assert_eq!(stored.get("version").and_then(Value::as_str), Some("1.0"));
}

#[tokio::test]
async fn test_corrupt_blob_fails_load_but_not_startup() {
    init_logging();
    let backend: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    backend.set(HABITS_KEY, json!("scrambled")).await.unwrap();

    let adapter = PersistenceAdapter::new(backend.clone());
    assert!(matches!(
        adapter.load().await,
        Err(StorageError::CorruptData(_))
    ));

    // the store falls back to an empty, usable state
    let mut store = HabitStore::open(backend, clock_on("2025-03-10")).await;
    assert!(store.habits().is_empty());
    assert!(!store.loading());
    store.add_habit(draft("Fresh start", 1)).await.unwrap();
    assert_eq!(store.total_habits(), 1);
}

#[tokio::test]
async fn test_clear_all_is_idempotent() {
    let backend: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let adapter = PersistenceAdapter::new(backend.clone());

    adapter
        .save(&[Habit::from_draft(draft("Read", 1), Utc::now())], None, Utc::now())
        .await
        .unwrap();

    adapter.clear_all().await.unwrap();
    assert!(adapter.load().await.unwrap().is_none());

    // clearing an already-empty store is fine
    adapter.clear_all().await.unwrap();
}

#[tokio::test]
async fn test_user_round_trip_and_unreadable_profile() {
    init_logging();
    let backend: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let adapter = PersistenceAdapter::new(backend.clone());

    assert!(adapter.load_user().await.unwrap().is_none());

    let user = User::from_credentials(
        &Credentials {
            email: "sam@example.com".to_string(),
            password: "longenough1".to_string(),
            name: Some("Sam".to_string()),
        },
        Utc::now(),
    );
    adapter.save_user(&user).await.unwrap();
    assert_eq!(adapter.load_user().await.unwrap(), Some(user));

    // a broken profile blob reads as absent instead of failing startup
    backend.set(USER_KEY, json!([1, 2, 3])).await.unwrap();
    assert!(adapter.load_user().await.unwrap().is_none());
}

/// Backend whose reads always fail, for exercising the load error path.
struct UnreadableStore;

#[async_trait]
impl KeyValueStore for UnreadableStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
        Err(StorageError::Persistence("disk on fire".to_string()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Backend that accepts nothing, for exercising the best-effort save policy.
struct ReadOnlyStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
        Err(StorageError::Persistence("read-only backend".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Persistence("read-only backend".to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Persistence("read-only backend".to_string()))
    }
}

#[tokio::test]
async fn test_backend_read_failure_sets_error_flag() {
    init_logging();
    let store = HabitStore::open(Arc::new(UnreadableStore), clock_on("2025-03-10")).await;

    assert!(store.error().is_some());
    assert!(!store.loading());
}

#[tokio::test]
async fn test_save_failures_never_roll_back_memory() {
    init_logging();
    let backend = Arc::new(ReadOnlyStore {
        inner: MemoryStore::new(),
    });
    let mut store = HabitStore::open(backend, clock_on("2025-03-10")).await;

    // the write fails behind the scenes, the command still succeeds
    let id = store.add_habit(draft("Drink water", 8)).await.unwrap();
    store.toggle_habit(&id).await.unwrap();

    assert_eq!(store.total_habits(), 1);
    assert!(store.habit(&id).unwrap().is_completed);
    assert_eq!(store.error(), None);

    // logout is the exception: it must not pretend data was wiped
    let err = store.logout().await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(store.total_habits(), 1);
    assert!(store.error().is_some());
}
