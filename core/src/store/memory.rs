//! In-memory key-value store for tests and development
//!
//! Implements the full [`KeyValueStore`] contract over a mutex-guarded
//! map, including TTL bookkeeping (entries are dropped lazily on
//! access). Batches run under a single lock acquisition, which gives
//! them the same all-or-nothing visibility as a MULTI/EXEC block.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{KeyValueStore, StoreError, StoreOp, StoreResult};

#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn text(value: impl Into<String>, expires_at: Option<Instant>) -> Self {
        Self {
            value: Value::Text(value.into()),
            expires_at,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |at| Instant::now() >= at)
    }
}

/// In-memory [`KeyValueStore`] implementation
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for test assertions
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| !entry.is_expired());
        entries.len()
    }

    /// Whether the store holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Force-expire a key, for tests that simulate TTL elapse
    pub fn expire_now(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    fn drop_if_expired(entries: &mut HashMap<String, Entry>, key: &str) {
        if entries.get(key).map_or(false, Entry::is_expired) {
            entries.remove(key);
        }
    }

    /// Live hash at `key`, created empty when absent
    fn hash_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> StoreResult<&'a mut HashMap<String, String>> {
        Self::drop_if_expired(entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Hash(HashMap::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::Hash(hash) => Ok(hash),
            Value::Text(_) => Err(StoreError::Unavailable(format!(
                "wrong value type at key '{key}'"
            ))),
        }
    }

    fn apply(entries: &mut HashMap<String, Entry>, op: &StoreOp) -> StoreResult<()> {
        match op {
            StoreOp::Set { key, value } => {
                entries.insert(key.clone(), Entry::text(value.clone(), None));
            }
            StoreOp::Delete { key } => {
                entries.remove(key);
            }
            StoreOp::HashSet { key, fields } => {
                let hash = Self::hash_entry(entries, key)?;
                for (field, value) in fields {
                    hash.insert(field.clone(), value.clone());
                }
            }
            StoreOp::HashIncrement { key, field, by } => {
                let hash = Self::hash_entry(entries, key)?;
                let current: i64 = hash.get(field).and_then(|v| v.parse().ok()).unwrap_or(0);
                hash.insert(field.clone(), (current + by).to_string());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        Self::drop_if_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::Text(value),
                ..
            }) => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), Entry::text(value, None));
        Ok(())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap();
        let expires_at = Instant::now() + Duration::from_secs(expiry_seconds);
        entries.insert(key.to_string(), Entry::text(value, Some(expires_at)));
        Ok(())
    }

    async fn increment(&self, key: &str, expiry_seconds: Option<u64>) -> StoreResult<i64> {
        let mut entries = self.entries.lock().unwrap();
        Self::drop_if_expired(&mut entries, key);
        match entries.get_mut(key) {
            Some(Entry {
                value: Value::Text(value),
                ..
            }) => {
                let current: i64 = value.parse().map_err(|_| {
                    StoreError::Unavailable(format!("non-integer counter at key '{key}'"))
                })?;
                let next = current + 1;
                *value = next.to_string();
                Ok(next)
            }
            Some(_) => Err(StoreError::Unavailable(format!(
                "wrong value type at key '{key}'"
            ))),
            None => {
                let expires_at =
                    expiry_seconds.map(|secs| Instant::now() + Duration::from_secs(secs));
                entries.insert(key.to_string(), Entry::text("1", expires_at));
                Ok(1)
            }
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        Self::drop_if_expired(&mut entries, key);
        Ok(entries.remove(key).is_some())
    }

    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        Self::drop_if_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.get(field).cloned()),
            _ => Ok(None),
        }
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut entries = self.entries.lock().unwrap();
        Self::drop_if_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.clone()),
            _ => Ok(HashMap::new()),
        }
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap();
        let hash = Self::hash_entry(&mut entries, key)?;
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn scan_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| !entry.is_expired());

        let keys = match pattern.strip_suffix('*') {
            Some(prefix) => entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect(),
            None => entries.keys().filter(|k| *k == pattern).cloned().collect(),
        };
        Ok(keys)
    }

    async fn execute_atomic(&self, ops: Vec<StoreOp>) -> StoreResult<()> {
        // One lock acquisition for the whole batch
        let mut entries = self.entries.lock().unwrap();
        for op in &ops {
            Self::apply(&mut entries, op)?;
        }
        Ok(())
    }
}
