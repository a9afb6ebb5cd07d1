//! Twilio delivery implementation
//!
//! Sends codes as SMS via the Twilio Messages REST API. Provider-side
//! rejections and transport errors are reported through the receipt.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::delivery::code_message;
use crate::InfrastructureError;
use vg_core::services::delivery::{DeliveryReceipt, DeliverySender};
use vg_shared::config::TwilioSettings;
use vg_shared::utils::phone::mask_identifier;

/// Request timeout for Twilio API calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Twilio SMS delivery sender
#[derive(Clone)]
pub struct TwilioDeliverySender {
    http: reqwest::Client,
    settings: TwilioSettings,
    issuer_name: String,
}

impl TwilioDeliverySender {
    /// Create a new Twilio delivery sender
    ///
    /// Fails when credentials are missing or the sender number is not
    /// in E.164 format.
    pub fn new(
        settings: TwilioSettings,
        issuer_name: String,
    ) -> Result<Self, InfrastructureError> {
        if settings.account_sid.is_empty() || settings.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Twilio credentials are not configured".to_string(),
            ));
        }
        if !settings.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_PHONE_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                InfrastructureError::Config(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            settings,
            issuer_name,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.settings.account_sid
        )
    }
}

#[async_trait]
impl DeliverySender for TwilioDeliverySender {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        let body = code_message(&self.issuer_name, code);
        let params = [
            ("To", identifier),
            ("From", self.settings.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&params)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let sid = response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("sid").and_then(|v| v.as_str()).map(String::from));

                info!(
                    identifier = %mask_identifier(identifier),
                    sid = sid.as_deref().unwrap_or("unknown"),
                    "Twilio message accepted"
                );
                DeliveryReceipt::delivered(sid)
            }
            Ok(response) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    status = %response.status(),
                    "Twilio rejected message"
                );
                DeliveryReceipt::failed()
            }
            Err(e) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    "Twilio request failed: {}", e
                );
                DeliveryReceipt::failed()
            }
        }
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> TwilioSettings {
        TwilioSettings {
            account_sid: "AC_test".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550001111".to_string(),
        }
    }

    #[test]
    fn test_new_with_valid_settings() {
        let sender = TwilioDeliverySender::new(valid_settings(), "VerifyGate".to_string());
        assert!(sender.is_ok());
        assert_eq!(sender.unwrap().provider_name(), "twilio");
    }

    #[test]
    fn test_new_rejects_missing_credentials() {
        let mut settings = valid_settings();
        settings.auth_token = String::new();
        let result = TwilioDeliverySender::new(settings, "VerifyGate".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_bad_from_number() {
        let mut settings = valid_settings();
        settings.from_number = "15550001111".to_string();
        let result = TwilioDeliverySender::new(settings, "VerifyGate".to_string());
        assert!(matches!(result, Err(InfrastructureError::Config(msg)) if msg.contains("E.164")));
    }

    #[test]
    fn test_messages_url() {
        let sender =
            TwilioDeliverySender::new(valid_settings(), "VerifyGate".to_string()).unwrap();
        assert_eq!(
            sender.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC_test/Messages.json"
        );
    }
}
