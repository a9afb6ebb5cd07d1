//! Store module for the Redis key-value adapter
//!
//! Provides the Redis-backed implementation of the core store contract,
//! including connection setup, retry logic for transient errors, and
//! atomic multi-command batches.

pub mod redis_store;

pub use redis_store::RedisStore;

// Re-export commonly used types
pub use vg_shared::config::cache::CacheConfig;
