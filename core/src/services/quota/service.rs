//! Quota manager service implementation
//!
//! API keys are persisted under two coupled store entries:
//! - `apikey:<secret_digest>` - hash holding the [`ApiKeyRecord`] fields
//! - `clientid:<client_id>` - string lookup from client id to digest
//!
//! The pair is created and destroyed in one atomic batch so no reader
//! ever observes an orphaned half. The raw secret is returned exactly
//! once at creation; only its SHA-256 digest is stored.

use rand::{rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::api_key::{
    ApiKeyRecord, KeyStatus, FIELD_MONTHLY_LIMIT, FIELD_PERIOD_START, FIELD_STATUS, FIELD_USAGE,
};
use crate::errors::{QuotaError, QuotaResult};
use crate::store::{KeyValueStore, StoreOp};

/// Prefix of every raw API secret
const API_KEY_PREFIX: &str = "sk_";

/// Bytes of entropy behind a raw API secret
const SECRET_BYTES: usize = 24;

/// Store key prefix for digest-keyed records
const API_KEY_HASH_PREFIX: &str = "apikey:";

/// Store key prefix for client-id lookups
const CLIENT_ID_LOOKUP_PREFIX: &str = "clientid:";

/// Hash of per-client issuance statistics
const STATS_KEY: &str = "stats:otp:generated";

/// A successfully authorized key, ready for downstream charging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKey {
    /// Client identifier to charge usage against
    pub client_id: String,
}

/// Partial update of a key's mutable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUpdate {
    /// New lifecycle status, when supplied
    pub status: Option<KeyStatus>,
    /// New monthly limit, when supplied
    pub monthly_limit: Option<u64>,
}

/// API key quota manager
///
/// Generic over the store contract; constructed with an explicitly
/// injected store handle.
#[derive(Clone)]
pub struct QuotaService<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> QuotaService<S> {
    /// Create a new quota manager over the given store handle
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a new API key for a client
    ///
    /// Fails with [`QuotaError::Conflict`] when the client id already
    /// has a live record. On success the digest-keyed record and the
    /// client-id lookup are written in one atomic batch and the raw
    /// secret is returned - the only time it ever exists outside the
    /// caller.
    pub async fn create_key(&self, client_id: &str, monthly_limit: u64) -> QuotaResult<String> {
        if self.find_key_by_client_id(client_id).await?.is_some() {
            return Err(QuotaError::Conflict {
                client_id: client_id.to_string(),
            });
        }

        let raw_secret = generate_secret();
        let digest = digest_secret(&raw_secret);
        let record = ApiKeyRecord::new(client_id, monthly_limit);

        self.store
            .execute_atomic(vec![
                StoreOp::HashSet {
                    key: record_key(&digest),
                    fields: record.to_fields(),
                },
                StoreOp::Set {
                    key: lookup_key(client_id),
                    value: digest,
                },
            ])
            .await?;

        info!(client_id, monthly_limit, "API key created");
        Ok(raw_secret)
    }

    /// Authorize a raw secret and check its quota
    ///
    /// Malformed secrets are rejected before any store round trip. The
    /// record's usage period is lazily rolled over as part of the read:
    /// when the stored `period_start` is stale, usage is reset to zero
    /// for the current month. Concurrent rollovers converge on the same
    /// values, so the write is deliberately not guarded by a lock.
    pub async fn authorize_key(&self, raw_secret: &str) -> QuotaResult<AuthorizedKey> {
        if !is_well_formed(raw_secret) {
            return Err(QuotaError::InvalidFormat);
        }

        let digest = digest_secret(raw_secret);
        let record = self
            .load_and_roll_period(&record_key(&digest))
            .await?
            .ok_or(QuotaError::UnknownKey)?;

        if record.status != KeyStatus::Active {
            debug!(client_id = %record.client_id, "authorization refused: key inactive");
            return Err(QuotaError::KeyInactive);
        }

        if !record.has_quota_remaining() {
            warn!(
                client_id = %record.client_id,
                usage = record.usage,
                monthly_limit = record.monthly_limit,
                "authorization refused: monthly quota exceeded"
            );
            return Err(QuotaError::QuotaExceeded);
        }

        Ok(AuthorizedKey {
            client_id: record.client_id,
        })
    }

    /// Charge one issuance against a client's usage
    ///
    /// Increments the record's usage field and the per-client statistics
    /// counter in a single atomic batch. A missing client id is a no-op:
    /// charging is best-effort bookkeeping, the authorization gate has
    /// already run.
    pub async fn charge_usage(&self, client_id: &str) -> QuotaResult<()> {
        let Some(digest) = self.store.get(&lookup_key(client_id)).await? else {
            debug!(client_id, "charge skipped: no live record");
            return Ok(());
        };

        self.store
            .execute_atomic(vec![
                StoreOp::HashIncrement {
                    key: record_key(&digest),
                    field: FIELD_USAGE.to_string(),
                    by: 1,
                },
                StoreOp::HashIncrement {
                    key: STATS_KEY.to_string(),
                    field: client_id.to_string(),
                    by: 1,
                },
            ])
            .await?;

        Ok(())
    }

    /// Update the supplied fields of a key
    ///
    /// Returns `false` when the client id has no live record.
    pub async fn update_key(&self, client_id: &str, update: KeyUpdate) -> QuotaResult<bool> {
        let Some(digest) = self.store.get(&lookup_key(client_id)).await? else {
            return Ok(false);
        };

        let mut fields = Vec::new();
        if let Some(status) = update.status {
            fields.push((FIELD_STATUS.to_string(), status.as_str().to_string()));
        }
        if let Some(monthly_limit) = update.monthly_limit {
            fields.push((FIELD_MONTHLY_LIMIT.to_string(), monthly_limit.to_string()));
        }

        if !fields.is_empty() {
            self.store.hash_set(&record_key(&digest), &fields).await?;
            info!(client_id, "API key updated");
        }
        Ok(true)
    }

    /// Revoke a key, deleting record and lookup atomically
    ///
    /// Returns `false` when the client id has no live record.
    pub async fn revoke_key(&self, client_id: &str) -> QuotaResult<bool> {
        let Some(digest) = self.store.get(&lookup_key(client_id)).await? else {
            return Ok(false);
        };

        self.store
            .execute_atomic(vec![
                StoreOp::Delete {
                    key: record_key(&digest),
                },
                StoreOp::Delete {
                    key: lookup_key(client_id),
                },
            ])
            .await?;

        info!(client_id, "API key revoked");
        Ok(true)
    }

    /// Look up a record by client id
    pub async fn find_key_by_client_id(
        &self,
        client_id: &str,
    ) -> QuotaResult<Option<ApiKeyRecord>> {
        let Some(digest) = self.store.get(&lookup_key(client_id)).await? else {
            return Ok(None);
        };

        let fields = self.store.hash_get_all(&record_key(&digest)).await?;
        Ok(ApiKeyRecord::from_fields(&fields))
    }

    /// Enumerate all live key records
    ///
    /// Eventually consistent with concurrent writes; malformed stored
    /// records are skipped.
    pub async fn list_keys(&self) -> QuotaResult<Vec<ApiKeyRecord>> {
        let keys = self
            .store
            .scan_matching(&format!("{API_KEY_HASH_PREFIX}*"))
            .await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let fields = self.store.hash_get_all(&key).await?;
            if let Some(record) = ApiKeyRecord::from_fields(&fields) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Total codes ever issued for a client, from the statistics hash
    pub async fn usage_stats(&self, client_id: &str) -> QuotaResult<u64> {
        let count = self.store.hash_get(STATS_KEY, client_id).await?;
        Ok(count.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    /// Read a record and lazily roll its usage period over
    async fn load_and_roll_period(&self, key: &str) -> QuotaResult<Option<ApiKeyRecord>> {
        let fields = self.store.hash_get_all(key).await?;
        let Some(mut record) = ApiKeyRecord::from_fields(&fields) else {
            return Ok(None);
        };

        let current_period = ApiKeyRecord::current_period_start();
        if record.needs_rollover(&current_period) {
            debug!(
                client_id = %record.client_id,
                stale_period = %record.period_start,
                "rolling usage period over"
            );
            self.store
                .hash_set(
                    key,
                    &[
                        (FIELD_PERIOD_START.to_string(), current_period.clone()),
                        (FIELD_USAGE.to_string(), "0".to_string()),
                    ],
                )
                .await?;
            record.period_start = current_period;
            record.usage = 0;
        }

        Ok(Some(record))
    }
}

/// Generate a raw API secret: `sk_` + hex of [`SECRET_BYTES`] random bytes
fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill(&mut bytes[..]);
    format!("{API_KEY_PREFIX}{}", hex::encode(bytes))
}

/// SHA-256 digest of a raw secret, hex encoded
fn digest_secret(raw_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Shape check for raw secrets, run before any store access
fn is_well_formed(raw_secret: &str) -> bool {
    match raw_secret.strip_prefix(API_KEY_PREFIX) {
        Some(body) => body.len() == SECRET_BYTES * 2 && body.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn record_key(digest: &str) -> String {
    format!("{API_KEY_HASH_PREFIX}{digest}")
}

fn lookup_key(client_id: &str) -> String {
    format!("{CLIENT_ID_LOOKUP_PREFIX}{client_id}")
}
