//! Integration tests for the Redis store adapter
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p vg_infra --test redis_store_integration -- --ignored

use vg_core::store::{KeyValueStore, StoreOp};
use vg_infra::store::{CacheConfig, RedisStore};

fn test_config() -> CacheConfig {
    CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_connection_and_health() {
    let store = RedisStore::new(test_config())
        .await
        .expect("Failed to connect to Redis");
    assert!(store.health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_with_expiry_and_get() {
    let store = RedisStore::new(test_config()).await.unwrap();

    let key = "test:otp:15550001111";
    store.set_with_expiry(key, "123456", 300).await.unwrap();

    assert_eq!(store.get(key).await.unwrap(), Some("123456".to_string()));

    store.delete(key).await.unwrap();
    assert_eq!(store.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_increment_applies_ttl_on_creation() {
    let store = RedisStore::new(test_config()).await.unwrap();

    let key = "test:attempts:15550001111";
    store.delete(key).await.unwrap();

    assert_eq!(store.increment(key, Some(300)).await.unwrap(), 1);
    assert_eq!(store.increment(key, Some(300)).await.unwrap(), 2);

    store.delete(key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_hash_roundtrip() {
    let store = RedisStore::new(test_config()).await.unwrap();

    let key = "test:apikey:record";
    store.delete(key).await.unwrap();

    store
        .hash_set(
            key,
            &[
                ("client_id".to_string(), "acme".to_string()),
                ("usage".to_string(), "0".to_string()),
            ],
        )
        .await
        .unwrap();

    let all = store.hash_get_all(key).await.unwrap();
    assert_eq!(all.get("client_id"), Some(&"acme".to_string()));
    assert_eq!(
        store.hash_get(key, "usage").await.unwrap(),
        Some("0".to_string())
    );

    store.delete(key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_atomic_batch_pairs_writes() {
    let store = RedisStore::new(test_config()).await.unwrap();

    let record_key = "test:apikey:atomic";
    let lookup_key = "test:clientid:atomic";

    store
        .execute_atomic(vec![
            StoreOp::HashSet {
                key: record_key.to_string(),
                fields: vec![("usage".to_string(), "0".to_string())],
            },
            StoreOp::Set {
                key: lookup_key.to_string(),
                value: "digest".to_string(),
            },
        ])
        .await
        .unwrap();

    assert_eq!(
        store.get(lookup_key).await.unwrap(),
        Some("digest".to_string())
    );

    store
        .execute_atomic(vec![
            StoreOp::HashIncrement {
                key: record_key.to_string(),
                field: "usage".to_string(),
                by: 1,
            },
            StoreOp::HashIncrement {
                key: record_key.to_string(),
                field: "usage".to_string(),
                by: 1,
            },
        ])
        .await
        .unwrap();
    assert_eq!(
        store.hash_get(record_key, "usage").await.unwrap(),
        Some("2".to_string())
    );

    store
        .execute_atomic(vec![
            StoreOp::Delete {
                key: record_key.to_string(),
            },
            StoreOp::Delete {
                key: lookup_key.to_string(),
            },
        ])
        .await
        .unwrap();
    assert_eq!(store.get(lookup_key).await.unwrap(), None);
    assert!(store.hash_get_all(record_key).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_scan_matching() {
    let store = RedisStore::new(test_config()).await.unwrap();

    store.set("test:scan:a", "1").await.unwrap();
    store.set("test:scan:b", "2").await.unwrap();

    let keys = store.scan_matching("test:scan:*").await.unwrap();
    assert!(keys.contains(&"test:scan:a".to_string()));
    assert!(keys.contains(&"test:scan:b".to_string()));

    store.delete("test:scan:a").await.unwrap();
    store.delete("test:scan:b").await.unwrap();
}
