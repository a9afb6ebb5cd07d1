//! One-time code lifecycle configuration

use serde::{Deserialize, Serialize};

/// Configuration for one-time code generation and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds until an issued code expires
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: u64,

    /// Maximum verification attempts per issued code
    #[serde(default = "default_max_verify_attempts")]
    pub max_verify_attempts: i64,

    /// Name shown to the recipient in the delivery message
    #[serde(default = "default_issuer_name")]
    pub issuer_name: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            expiry_seconds: default_expiry_seconds(),
            max_verify_attempts: default_max_verify_attempts(),
            issuer_name: default_issuer_name(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let code_length = std::env::var("OTP_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_code_length);
        let expiry_seconds = std::env::var("OTP_EXPIRY_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_expiry_seconds);
        let max_verify_attempts = std::env::var("MAX_VERIFY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_verify_attempts);
        let issuer_name =
            std::env::var("OTP_ISSUER_NAME").unwrap_or_else(|_| default_issuer_name());

        Self {
            code_length,
            expiry_seconds,
            max_verify_attempts,
            issuer_name,
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_expiry_seconds() -> u64 {
    180 // 3 minutes
}

fn default_max_verify_attempts() -> i64 {
    5
}

fn default_issuer_name() -> String {
    "VerifyGate".to_string()
}
