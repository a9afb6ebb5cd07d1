//! API key quota configuration

use serde::{Deserialize, Serialize};

/// Configuration for API key issuance quotas
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Monthly issuance limit applied when a key is created without one
    #[serde(default = "default_monthly_limit")]
    pub default_monthly_limit: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_monthly_limit: default_monthly_limit(),
        }
    }
}

impl QuotaConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let default_monthly_limit = std::env::var("DEFAULT_MONTHLY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_monthly_limit);

        Self {
            default_monthly_limit,
        }
    }
}

fn default_monthly_limit() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_config_default() {
        let config = QuotaConfig::default();
        assert_eq!(config.default_monthly_limit, 1000);
    }
}
