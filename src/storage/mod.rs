//! Storage layer for persisting habit data.
//!
//! The store only ever talks to a key-value contract: string keys mapping to
//! JSON-serializable blobs, with `get`/`set`/`remove`/`clear`. The adapter on
//! top of it owns blob shapes, versioning, and migration.

pub mod adapter;
pub mod file;
pub mod memory;
pub mod migrations;

// Re-export the main storage types
pub use adapter::*;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store failed to read or write
    #[error("storage backend error: {0}")]
    Persistence(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted snapshot is fundamentally unreadable (not an object);
    /// the store falls back to an empty state rather than failing startup
    #[error("corrupt persisted data: {0}")]
    CorruptData(String),
}

/// External key-value blob store contract.
///
/// This is the shape of on-device storage the app runs against; the crate
/// ships an in-memory implementation and a JSON-file one, and a host can
/// provide its own. Each `set` replaces the whole value for a key, so writes
/// to a key never interleave partially.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key. Must be idempotent.
    async fn clear(&self) -> Result<(), StorageError>;
}
