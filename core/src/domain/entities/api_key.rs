//! API key entity with monthly usage accounting.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stored hash field names for an API key record
pub const FIELD_CLIENT_ID: &str = "client_id";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_MONTHLY_LIMIT: &str = "monthly_limit";
pub const FIELD_USAGE: &str = "usage";
pub const FIELD_PERIOD_START: &str = "period_start";

/// Lifecycle status of an API key
///
/// Paused keys fail authorization with a distinct reason from unknown
/// keys; they keep their record and can be re-activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Active,
    Paused,
}

impl KeyStatus {
    /// Stored string form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Paused => "paused",
        }
    }

    /// Parse the stored string form; unknown values are rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(KeyStatus::Active),
            "paused" => Some(KeyStatus::Paused),
            _ => None,
        }
    }
}

/// API key record identifying a consumer and its entitlement
///
/// The record is persisted as a store hash keyed by the SHA-256 digest of
/// the raw secret; the raw secret itself is returned exactly once at
/// creation and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Caller-assigned unique client identifier
    pub client_id: String,

    /// Lifecycle status
    pub status: KeyStatus,

    /// RFC 3339 creation timestamp, immutable
    pub created_at: String,

    /// Monthly issuance limit
    pub monthly_limit: u64,

    /// Issuances counted in the current period
    pub usage: u64,

    /// First-of-month date (`YYYY-MM-01`) the usage counter applies to
    pub period_start: String,
}

impl ApiKeyRecord {
    /// Create a fresh active record for the current period
    pub fn new(client_id: impl Into<String>, monthly_limit: u64) -> Self {
        Self {
            client_id: client_id.into(),
            status: KeyStatus::Active,
            created_at: Utc::now().to_rfc3339(),
            monthly_limit,
            usage: 0,
            period_start: Self::current_period_start(),
        }
    }

    /// First-of-month marker for the current billing period
    pub fn current_period_start() -> String {
        Utc::now().format("%Y-%m-01").to_string()
    }

    /// Whether the stored period differs from the given current period
    pub fn needs_rollover(&self, current_period: &str) -> bool {
        self.period_start != current_period
    }

    /// Whether the key may issue another code this period
    pub fn has_quota_remaining(&self) -> bool {
        self.usage < self.monthly_limit
    }

    /// Field pairs for persisting the record as a store hash
    pub fn to_fields(&self) -> Vec<(String, String)> {
        vec![
            (FIELD_CLIENT_ID.to_string(), self.client_id.clone()),
            (FIELD_STATUS.to_string(), self.status.as_str().to_string()),
            (FIELD_CREATED_AT.to_string(), self.created_at.clone()),
            (
                FIELD_MONTHLY_LIMIT.to_string(),
                self.monthly_limit.to_string(),
            ),
            (FIELD_USAGE.to_string(), self.usage.to_string()),
            (FIELD_PERIOD_START.to_string(), self.period_start.clone()),
        ]
    }

    /// Rebuild a record from stored hash fields, failing closed
    ///
    /// Any missing field or unparsable value yields `None`; a malformed
    /// stored record is indistinguishable from an absent one.
    pub fn from_fields(fields: &HashMap<String, String>) -> Option<Self> {
        let client_id = fields.get(FIELD_CLIENT_ID)?.clone();
        let status = KeyStatus::parse(fields.get(FIELD_STATUS)?)?;
        let created_at = fields.get(FIELD_CREATED_AT)?.clone();
        let monthly_limit = fields.get(FIELD_MONTHLY_LIMIT)?.parse().ok()?;
        let usage = fields.get(FIELD_USAGE)?.parse().ok()?;
        let period_start = fields.get(FIELD_PERIOD_START)?.clone();

        Some(Self {
            client_id,
            status,
            created_at,
            monthly_limit,
            usage,
            period_start,
        })
    }
}
