//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure handed to the boundary layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const INVALID_API_KEY_FORMAT: &str = "INVALID_API_KEY_FORMAT";
    pub const API_KEY_UNKNOWN: &str = "API_KEY_UNKNOWN";
    pub const API_KEY_INACTIVE: &str = "API_KEY_INACTIVE";
    pub const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";
    pub const CLIENT_ID_CONFLICT: &str = "CLIENT_ID_CONFLICT";
    pub const OTP_EXPIRED: &str = "OTP_EXPIRED";
    pub const OTP_INVALID: &str = "OTP_INVALID";
    pub const OTP_TOO_MANY_ATTEMPTS: &str = "OTP_TOO_MANY_ATTEMPTS";
    pub const DELIVERY_FAILED: &str = "DELIVERY_FAILED";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

/// Result type with ErrorResponse as error
pub type ApiResult<T> = Result<T, ErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_new() {
        let response = ErrorResponse::new(error_codes::QUOTA_EXCEEDED, "Monthly limit reached");
        assert_eq!(response.error, "QUOTA_EXCEEDED");
        assert_eq!(response.message, "Monthly limit reached");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let response = ErrorResponse::new(error_codes::OTP_INVALID, "Invalid code")
            .add_detail("remaining_attempts", 2);

        let details = response.details.expect("details should be set");
        assert_eq!(details["remaining_attempts"], 2);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::OTP_EXPIRED, "Code expired");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("OTP_EXPIRED"));
        assert!(!json.contains("details"));
    }
}
