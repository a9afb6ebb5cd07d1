//! Outbound delivery capability
//!
//! The OTP lifecycle manager only needs a narrow send capability from
//! the delivery channel. Ordinary delivery failure is an expected,
//! frequent condition, so it is a field of the receipt rather than an
//! error: implementations must not fail the call for a message the
//! provider simply declined to carry.

use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Whether the provider accepted the message
    pub delivered: bool,

    /// Provider-side reference for the message, when available
    pub provider_ref: Option<String>,
}

impl DeliveryReceipt {
    /// A successful delivery with an optional provider reference
    pub fn delivered(provider_ref: Option<String>) -> Self {
        Self {
            delivered: true,
            provider_ref,
        }
    }

    /// A failed delivery
    pub fn failed() -> Self {
        Self {
            delivered: false,
            provider_ref: None,
        }
    }
}

/// Trait for delivery provider integration
#[async_trait]
pub trait DeliverySender: Send + Sync {
    /// Send a one-time code to an identifier
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt;

    /// Name of the underlying provider, for logging
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl DeliverySender for Box<dyn DeliverySender> {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        (**self).send(identifier, code).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

#[async_trait]
impl DeliverySender for Arc<dyn DeliverySender> {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        (**self).send(identifier, code).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
