//! Mock delivery implementation
//!
//! Logs codes to the console instead of sending them. Intended for
//! development and testing only.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use vg_core::services::delivery::{DeliveryReceipt, DeliverySender};
use vg_shared::utils::phone::{is_valid_identifier, mask_identifier};

/// Mock delivery sender for development and testing
#[derive(Clone)]
pub struct MockDeliverySender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockDeliverySender {
    /// Create a new mock delivery sender
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock sender that reports every delivery as failed
    pub fn with_simulated_failure() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockDeliverySender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliverySender for MockDeliverySender {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        if !is_valid_identifier(identifier) {
            warn!(
                "Mock delivery refused invalid identifier: {}",
                mask_identifier(identifier)
            );
            return DeliveryReceipt::failed();
        }

        if self.simulate_failure {
            warn!(
                "Mock delivery simulating failure for identifier: {}",
                mask_identifier(identifier)
            );
            return DeliveryReceipt::failed();
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let provider_ref = format!("mock_{}", Uuid::new_v4());

        // Development convenience: the code is visible in the console
        info!(
            "[MOCK DELIVERY #{}] to {}: code {}",
            count,
            mask_identifier(identifier),
            code
        );

        DeliveryReceipt::delivered(Some(provider_ref))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
