//! Delivery provider configuration

use serde::{Deserialize, Serialize};

/// Outbound delivery provider configuration
///
/// Selects which provider sends codes to end users and carries the
/// credentials each provider needs. Unknown provider names fall back
/// to the mock implementation at the factory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Provider name ("mock", "twilio", "custom")
    pub provider: String,

    /// Twilio provider settings
    #[serde(default)]
    pub twilio: TwilioSettings,

    /// Custom HTTP API provider settings
    #[serde(default)]
    pub custom_api: CustomApiSettings,
}

/// Twilio REST API credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TwilioSettings {
    /// Account SID
    pub account_sid: String,
    /// Auth token
    pub auth_token: String,
    /// Sender phone number (E.164)
    pub from_number: String,
}

/// Credentials for a generic JSON messaging API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomApiSettings {
    /// Base URL of the provider API
    pub base_url: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            twilio: TwilioSettings::default(),
            custom_api: CustomApiSettings::default(),
        }
    }
}

impl DeliveryConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("OTP_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or_else(|_| "mock".to_string()),
            twilio: TwilioSettings {
                account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
                auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
                from_number: std::env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            },
            custom_api: CustomApiSettings {
                base_url: std::env::var("CUSTOM_API_BASE_URL").unwrap_or_default(),
                username: std::env::var("CUSTOM_API_USER").unwrap_or_default(),
                password: std::env::var("CUSTOM_API_PASSWORD").unwrap_or_default(),
            },
        }
    }
}
