//! Generic JSON messaging provider
//!
//! Posts codes to a self-hosted messaging gateway speaking a simple
//! JSON contract: `POST {base_url}/3rdparty/v1/messages` with basic
//! auth, answering `202 Accepted` with a message id when the message
//! was enqueued.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::delivery::code_message;
use crate::InfrastructureError;
use vg_core::services::delivery::{DeliveryReceipt, DeliverySender};
use vg_shared::config::CustomApiSettings;
use vg_shared::utils::phone::mask_identifier;

/// Request timeout for provider API calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Delivery sender for a generic JSON messaging API
#[derive(Clone)]
pub struct CustomApiDeliverySender {
    http: reqwest::Client,
    settings: CustomApiSettings,
    issuer_name: String,
}

impl CustomApiDeliverySender {
    /// Create a new custom API delivery sender
    pub fn new(
        settings: CustomApiSettings,
        issuer_name: String,
    ) -> Result<Self, InfrastructureError> {
        if settings.base_url.is_empty() || settings.username.is_empty() || settings.password.is_empty()
        {
            return Err(InfrastructureError::Config(
                "Custom API provider missing credentials or base URL".to_string(),
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
        format!("{}/3rdparty/v1/messages", self.settings.base_url)
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.settings.username, self.settings.password);
        format!("Basic {}", BASE64.encode(credentials))
    }
}

#[async_trait]
impl DeliverySender for CustomApiDeliverySender {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        let payload = json!({
            "message": code_message(&self.issuer_name, code),
            "phoneNumbers": [identifier],
        });

        let response = self
            .http
            .post(self.messages_url())
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status() == reqwest::StatusCode::ACCEPTED => {
                let message_id = response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("id").and_then(|v| v.as_str()).map(String::from));

                info!(
                    identifier = %mask_identifier(identifier),
                    message_id = message_id.as_deref().unwrap_or("unknown"),
                    "Custom API message enqueued"
                );
                DeliveryReceipt::delivered(message_id)
            }
            Ok(response) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    status = %response.status(),
                    "Custom API returned non-202 status"
                );
                DeliveryReceipt::failed()
            }
            Err(e) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    "Custom API request failed: {}", e
                );
                DeliveryReceipt::failed()
            }
        }
    }

    fn provider_name(&self) -> &str {
        "custom"
    }
}
