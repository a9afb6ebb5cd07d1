//! Key-value store contract
//!
//! The managers delegate all coordination to the store's atomicity
//! primitives: single-command operations are atomic on their own, and
//! multi-key writes that must never be observed half-applied go through
//! [`KeyValueStore::execute_atomic`], which carries all-or-nothing
//! semantics (MULTI/EXEC on a Redis-class store). Expiry is enforced by
//! the store's TTL mechanism; no component of this system runs timers
//! or background sweeps.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Store-level failure, fatal for the current request
///
/// Managers propagate this immediately without retrying; transient-error
/// handling is the store client's concern.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A single write queued into an atomic batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Set a string key
    Set { key: String, value: String },
    /// Delete a key of any type
    Delete { key: String },
    /// Set hash fields on a key
    HashSet {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// Increment a hash field by a signed amount
    HashIncrement {
        key: String,
        field: String,
        by: i64,
    },
}

/// Contract over a networked key-value store
///
/// Implemented by the Redis adapter in the infrastructure layer and by
/// [`MemoryStore`] for tests and development.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a string value
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Set a string value without expiry
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Set a string value with a time-to-live in seconds
    async fn set_with_expiry(&self, key: &str, value: &str, expiry_seconds: u64)
        -> StoreResult<()>;

    /// Atomically increment a counter, returning the post-increment value
    ///
    /// When `expiry_seconds` is given and the increment created the key,
    /// the TTL is applied so a fresh counter never outlives its window.
    async fn increment(&self, key: &str, expiry_seconds: Option<u64>) -> StoreResult<i64>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Get a single hash field
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Get all fields of a hash; empty map when the key is absent
    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Set (merge) hash fields on a key
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()>;

    /// Collect keys matching a glob-style pattern
    async fn scan_matching(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Execute a batch of writes with all-or-nothing semantics
    async fn execute_atomic(&self, ops: Vec<StoreOp>) -> StoreResult<()>;
}
