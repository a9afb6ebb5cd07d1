//! Quota manager behavior tests against the in-memory store

use std::sync::Arc;

use crate::domain::entities::api_key::{ApiKeyRecord, KeyStatus, FIELD_PERIOD_START};
use crate::errors::QuotaError;
use crate::services::quota::{KeyUpdate, QuotaService};
use crate::store::{KeyValueStore, MemoryStore};

fn service() -> (Arc<MemoryStore>, QuotaService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = QuotaService::new(store.clone());
    (store, service)
}

/// Stored record key for a client, resolved through the lookup entry
async fn record_key_for(store: &MemoryStore, client_id: &str) -> String {
    let digest = store
        .get(&format!("clientid:{client_id}"))
        .await
        .unwrap()
        .expect("lookup entry should exist");
    format!("apikey:{digest}")
}

#[tokio::test]
async fn test_create_then_authorize_roundtrip() {
    let (_, service) = service();

    let secret = service.create_key("acme", 100).await.unwrap();
    assert!(secret.starts_with("sk_"));

    let authorized = service.authorize_key(&secret).await.unwrap();
    assert_eq!(authorized.client_id, "acme");
}

#[tokio::test]
async fn test_duplicate_create_conflicts() {
    let (_, service) = service();

    let first_secret = service.create_key("acme", 100).await.unwrap();
    let err = service.create_key("acme", 50).await.unwrap_err();
    assert!(matches!(err, QuotaError::Conflict { client_id } if client_id == "acme"));

    // The first key remains valid
    assert!(service.authorize_key(&first_secret).await.is_ok());
}

#[tokio::test]
async fn test_malformed_secret_rejected_without_store_access() {
    let (store, service) = service();

    for bad in ["", "sk_", "sk_tooshort", "pk_0123456789abcdef", "123456"] {
        let err = service.authorize_key(bad).await.unwrap_err();
        assert!(matches!(err, QuotaError::InvalidFormat), "secret: {bad}");
    }

    // Fail-fast means nothing was ever written or read into being
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_secret() {
    let (_, service) = service();
    service.create_key("acme", 100).await.unwrap();

    let never_issued = format!("sk_{}", "0".repeat(48));
    let err = service.authorize_key(&never_issued).await.unwrap_err();
    assert!(matches!(err, QuotaError::UnknownKey));
}

#[tokio::test]
async fn test_paused_key_fails_distinctly() {
    let (_, service) = service();
    let secret = service.create_key("acme", 100).await.unwrap();

    let updated = service
        .update_key(
            "acme",
            KeyUpdate {
                status: Some(KeyStatus::Paused),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated);

    let err = service.authorize_key(&secret).await.unwrap_err();
    assert!(matches!(err, QuotaError::KeyInactive));

    // Re-activation restores authorization
    service
        .update_key(
            "acme",
            KeyUpdate {
                status: Some(KeyStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(service.authorize_key(&secret).await.is_ok());
}

#[tokio::test]
async fn test_quota_exhaustion_and_limit_raise() {
    let (_, service) = service();
    let secret = service.create_key("acme", 2).await.unwrap();

    // Two charges fit within the limit
    service.authorize_key(&secret).await.unwrap();
    service.charge_usage("acme").await.unwrap();
    service.authorize_key(&secret).await.unwrap();
    service.charge_usage("acme").await.unwrap();

    let err = service.authorize_key(&secret).await.unwrap_err();
    assert!(matches!(err, QuotaError::QuotaExceeded));

    // Raising the limit unlocks the key without touching usage
    service
        .update_key(
            "acme",
            KeyUpdate {
                monthly_limit: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(service.authorize_key(&secret).await.is_ok());
}

#[tokio::test]
async fn test_period_rollover_resets_usage() {
    let (store, service) = service();
    let secret = service.create_key("acme", 1).await.unwrap();

    service.charge_usage("acme").await.unwrap();
    let err = service.authorize_key(&secret).await.unwrap_err();
    assert!(matches!(err, QuotaError::QuotaExceeded));

    // Age the stored record into a previous billing period
    let record_key = record_key_for(&store, "acme").await;
    store
        .hash_set(
            &record_key,
            &[(FIELD_PERIOD_START.to_string(), "2024-01-01".to_string())],
        )
        .await
        .unwrap();

    // The next authorization rolls the period over and resets usage
    assert!(service.authorize_key(&secret).await.is_ok());

    let record = service
        .find_key_by_client_id("acme")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(record.usage, 0);
    assert_eq!(record.period_start, ApiKeyRecord::current_period_start());
}

#[tokio::test]
async fn test_revoke_deletes_both_halves() {
    let (store, service) = service();
    let secret = service.create_key("acme", 100).await.unwrap();

    assert!(service.revoke_key("acme").await.unwrap());
    let err = service.authorize_key(&secret).await.unwrap_err();
    assert!(matches!(err, QuotaError::UnknownKey));

    assert!(store.is_empty());
    assert!(!service.revoke_key("acme").await.unwrap());
}

#[tokio::test]
async fn test_update_unknown_returns_false() {
    let (_, service) = service();
    let updated = service
        .update_key(
            "ghost",
            KeyUpdate {
                monthly_limit: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn test_charge_unknown_is_a_noop() {
    let (store, service) = service();
    service.charge_usage("ghost").await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_usage_stats_counting() {
    let (_, service) = service();
    service.create_key("acme", 100).await.unwrap();

    assert_eq!(service.usage_stats("acme").await.unwrap(), 0);
    service.charge_usage("acme").await.unwrap();
    service.charge_usage("acme").await.unwrap();
    assert_eq!(service.usage_stats("acme").await.unwrap(), 2);

    assert_eq!(service.usage_stats("ghost").await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_keys_skips_malformed_records() {
    let (store, service) = service();
    service.create_key("acme", 100).await.unwrap();
    service.create_key("globex", 50).await.unwrap();

    // A corrupted record must read as absent, not break enumeration
    store
        .hash_set(
            "apikey:deadbeef",
            &[("status".to_string(), "active".to_string())],
        )
        .await
        .unwrap();

    let mut client_ids: Vec<String> = service
        .list_keys()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.client_id)
        .collect();
    client_ids.sort();
    assert_eq!(client_ids, vec!["acme".to_string(), "globex".to_string()]);
}

#[tokio::test]
async fn test_usage_counts_only_after_charge() {
    let (_, service) = service();
    let secret = service.create_key("acme", 2).await.unwrap();

    // Authorization alone does not consume quota
    for _ in 0..5 {
        service.authorize_key(&secret).await.unwrap();
    }
    service.charge_usage("acme").await.unwrap();
    assert!(service.authorize_key(&secret).await.is_ok());
}
