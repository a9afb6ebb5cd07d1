//! End-to-end issuance flow over the in-memory store
//!
//! Exercises the produced capabilities the way the boundary layer
//! sequences them: authorize -> issue -> charge -> verify.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use vg_core::errors::{OtpError, QuotaError};
use vg_core::services::delivery::{DeliveryReceipt, DeliverySender};
use vg_core::services::otp::OtpService;
use vg_core::services::quota::QuotaService;
use vg_core::store::MemoryStore;
use vg_shared::config::OtpConfig;

struct RecordingDelivery {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingDelivery {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl DeliverySender for RecordingDelivery {
    async fn send(&self, identifier: &str, code: &str) -> DeliveryReceipt {
        self.sent
            .lock()
            .unwrap()
            .push((identifier.to_string(), code.to_string()));
        DeliveryReceipt::delivered(Some("itest-ref".to_string()))
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

#[tokio::test]
async fn test_full_issuance_flow() {
    let store = Arc::new(MemoryStore::new());
    let delivery = Arc::new(RecordingDelivery::new());
    let quota = QuotaService::new(store.clone());
    let otp = OtpService::new(store.clone(), delivery.clone(), OtpConfig::default());

    // An administrator provisions a key with a limit of two issuances
    let secret = quota.create_key("acme", 2).await.unwrap();

    // First request: authorize, issue, charge, verify
    let authorized = quota.authorize_key(&secret).await.unwrap();
    let issued = otp.issue_challenge("+15551234567").await.unwrap();
    assert!(!issued.reference.is_empty());
    quota.charge_usage(&authorized.client_id).await.unwrap();

    let code = delivery.last_code().unwrap();
    otp.verify_challenge("+15551234567", &code).await.unwrap();

    // Second request for a different identifier
    let authorized = quota.authorize_key(&secret).await.unwrap();
    otp.issue_challenge("+15557654321").await.unwrap();
    quota.charge_usage(&authorized.client_id).await.unwrap();

    // The key is now exhausted for the month
    let err = quota.authorize_key(&secret).await.unwrap_err();
    assert!(matches!(err, QuotaError::QuotaExceeded));

    // The outstanding challenge still verifies; quota gates issuance only
    let code = delivery.last_code().unwrap();
    otp.verify_challenge("+15557654321", &code).await.unwrap();

    // Statistics recorded one count per charge
    assert_eq!(quota.usage_stats("acme").await.unwrap(), 2);

    // A consumed challenge cannot be replayed
    let err = otp
        .verify_challenge("+15557654321", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, OtpError::Expired));
}
