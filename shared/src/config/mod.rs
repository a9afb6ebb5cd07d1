//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `cache` - Redis key-value store configuration
//! - `delivery` - Outbound delivery provider configuration
//! - `otp` - One-time code lifecycle configuration
//! - `quota` - API key quota configuration

pub mod cache;
pub mod delivery;
pub mod otp;
pub mod quota;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use delivery::{CustomApiSettings, DeliveryConfig, TwilioSettings};
pub use otp::OtpConfig;
pub use quota::QuotaConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Key-value store configuration
    pub cache: CacheConfig,

    /// One-time code configuration
    pub otp: OtpConfig,

    /// API key quota configuration
    pub quota: QuotaConfig,

    /// Delivery provider configuration
    pub delivery: DeliveryConfig,
}

impl AppConfig {
    /// Load the complete configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            otp: OtpConfig::from_env(),
            quota: QuotaConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            otp: OtpConfig::default(),
            quota: QuotaConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.cache.url, "redis://localhost:6379");
        assert_eq!(config.otp.code_length, 6);
        assert_eq!(config.quota.default_monthly_limit, 1000);
        assert_eq!(config.delivery.provider, "mock");
    }
}
