//! Domain-specific error types
//!
//! Domain errors are expected outcomes, not defects: the boundary layer
//! maps them to status codes via their [`ErrorResponse`] conversion.
//! Only [`StoreError`] represents an infrastructure failure that is
//! fatal for the current request. Messages never include secret values.

use thiserror::Error;

use crate::store::StoreError;
use vg_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Errors from the API key quota manager
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Invalid API key format")]
    InvalidFormat,

    #[error("Invalid API key")]
    UnknownKey,

    #[error("API key is inactive")]
    KeyInactive,

    #[error("Monthly OTP limit exceeded for this API key")]
    QuotaExceeded,

    #[error("Client ID '{client_id}' already exists")]
    Conflict { client_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the OTP lifecycle manager
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("OTP is invalid or has expired")]
    Expired,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Too many incorrect attempts. Please request a new OTP")]
    TooManyAttempts,

    #[error("Failed to send OTP. Please try again later")]
    DeliveryFailed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for quota manager operations
pub type QuotaResult<T> = Result<T, QuotaError>;

/// Result alias for OTP lifecycle operations
pub type OtpResult<T> = Result<T, OtpError>;

impl From<&QuotaError> for ErrorResponse {
    fn from(err: &QuotaError) -> Self {
        let error_code = match err {
            QuotaError::InvalidFormat => error_codes::INVALID_API_KEY_FORMAT,
            QuotaError::UnknownKey => error_codes::API_KEY_UNKNOWN,
            QuotaError::KeyInactive => error_codes::API_KEY_INACTIVE,
            QuotaError::QuotaExceeded => error_codes::QUOTA_EXCEEDED,
            QuotaError::Conflict { .. } => error_codes::CLIENT_ID_CONFLICT,
            QuotaError::Store(_) => error_codes::STORE_UNAVAILABLE,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

impl From<&OtpError> for ErrorResponse {
    fn from(err: &OtpError) -> Self {
        let error_code = match err {
            OtpError::Expired => error_codes::OTP_EXPIRED,
            OtpError::InvalidCode => error_codes::OTP_INVALID,
            OtpError::TooManyAttempts => error_codes::OTP_TOO_MANY_ATTEMPTS,
            OtpError::DeliveryFailed => error_codes::DELIVERY_FAILED,
            OtpError::Store(_) => error_codes::STORE_UNAVAILABLE,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

impl IntoErrorResponse for QuotaError {
    fn to_error_response(&self) -> ErrorResponse {
        self.into()
    }
}

impl IntoErrorResponse for OtpError {
    fn to_error_response(&self) -> ErrorResponse {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_codes() {
        let response: ErrorResponse = (&QuotaError::QuotaExceeded).into();
        assert_eq!(response.error, "QUOTA_EXCEEDED");
        assert!(response.message.contains("Monthly OTP limit"));

        let response: ErrorResponse = (&QuotaError::Conflict {
            client_id: "acme".to_string(),
        })
            .into();
        assert_eq!(response.error, "CLIENT_ID_CONFLICT");
        assert!(response.message.contains("acme"));
    }

    #[test]
    fn test_otp_error_codes() {
        let response: ErrorResponse = (&OtpError::TooManyAttempts).into();
        assert_eq!(response.error, "OTP_TOO_MANY_ATTEMPTS");

        let response: ErrorResponse = (&OtpError::Expired).into();
        assert_eq!(response.error, "OTP_EXPIRED");
    }

    #[test]
    fn test_into_error_response_trait() {
        let response = OtpError::InvalidCode.to_error_response();
        assert_eq!(response.error, "OTP_INVALID");
    }

    #[test]
    fn test_store_error_bridging() {
        let err: QuotaError = StoreError::Unavailable("connection refused".to_string()).into();
        let response: ErrorResponse = (&err).into();
        assert_eq!(response.error, "STORE_UNAVAILABLE");
        assert!(response.message.contains("connection refused"));
    }
}
