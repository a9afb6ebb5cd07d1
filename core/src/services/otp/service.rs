//! OTP lifecycle service implementation
//!
//! A challenge for an identifier lives in two TTL-bound store entries
//! derived from the digits of the identifier:
//! - `otp:<digits>` - the code
//! - `attempts:<digits>` - the verification attempt counter
//!
//! Both are written with the same expiry window so they age out
//! together. Issuing a new challenge overwrites whatever challenge
//! previously existed for that identifier.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::challenge::{codes_match, OtpChallenge};
use crate::errors::{OtpError, OtpResult};
use crate::services::delivery::DeliverySender;
use crate::store::KeyValueStore;
use vg_shared::config::OtpConfig;
use vg_shared::utils::phone::{mask_identifier, sanitize_identifier};

/// Store key prefix for challenge codes
const OTP_KEY_PREFIX: &str = "otp:";

/// Store key prefix for attempt counters
const ATTEMPTS_KEY_PREFIX: &str = "attempts:";

/// Result of issuing a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedChallenge {
    /// Opaque reference token handed back to the caller
    pub reference: String,

    /// Provider-side message reference, when the provider returned one
    pub provider_ref: Option<String>,
}

/// OTP lifecycle manager
///
/// Generic over the store contract and the delivery capability; both
/// handles are injected at construction.
#[derive(Clone)]
pub struct OtpService<S: KeyValueStore, D: DeliverySender> {
    store: Arc<S>,
    delivery: Arc<D>,
    config: OtpConfig,
}

impl<S: KeyValueStore, D: DeliverySender> OtpService<S, D> {
    /// Create a new OTP lifecycle manager
    pub fn new(store: Arc<S>, delivery: Arc<D>, config: OtpConfig) -> Self {
        Self {
            store,
            delivery,
            config,
        }
    }

    /// Issue a fresh challenge for an identifier and deliver its code
    ///
    /// The code and the reset attempts counter are written as two
    /// TTL-bearing entries sharing the configured expiry window. When
    /// delivery fails the stored challenge is left in place - not
    /// retried, not rolled back - so a later issue call simply
    /// overwrites it.
    pub async fn issue_challenge(&self, identifier: &str) -> OtpResult<IssuedChallenge> {
        let challenge = OtpChallenge::new(identifier, self.config.code_length);
        let code_key = code_key(identifier);
        let attempts_key = attempts_key(identifier);

        self.store
            .set_with_expiry(&code_key, &challenge.code, self.config.expiry_seconds)
            .await?;
        self.store
            .set_with_expiry(&attempts_key, "0", self.config.expiry_seconds)
            .await?;

        let receipt = self.delivery.send(identifier, &challenge.code).await;
        if !receipt.delivered {
            warn!(
                identifier = %mask_identifier(identifier),
                provider = self.delivery.provider_name(),
                "delivery failed, challenge left in place"
            );
            return Err(OtpError::DeliveryFailed);
        }

        info!(
            identifier = %mask_identifier(identifier),
            provider = self.delivery.provider_name(),
            "challenge issued"
        );

        Ok(IssuedChallenge {
            reference: OtpChallenge::generate_reference(),
            provider_ref: receipt.provider_ref,
        })
    }

    /// Verify a submitted code against the live challenge
    ///
    /// The attempts counter is incremented before anything else, so a
    /// caller exceeding the limit is locked out even when the submitted
    /// code would have been correct. Lockout and successful
    /// verification both clear the challenge entries; an absent code
    /// reads as expired.
    pub async fn verify_challenge(&self, identifier: &str, submitted_code: &str) -> OtpResult<()> {
        let code_key = code_key(identifier);
        let attempts_key = attempts_key(identifier);

        let attempts = self
            .store
            .increment(&attempts_key, Some(self.config.expiry_seconds))
            .await?;

        if attempts > self.config.max_verify_attempts {
            warn!(
                identifier = %mask_identifier(identifier),
                attempts,
                max_attempts = self.config.max_verify_attempts,
                "attempt limit exceeded, challenge terminated"
            );
            self.clear_challenge(&code_key, &attempts_key).await?;
            return Err(OtpError::TooManyAttempts);
        }

        let Some(stored_code) = self.store.get(&code_key).await? else {
            debug!(
                identifier = %mask_identifier(identifier),
                "no live challenge (never issued or expired)"
            );
            return Err(OtpError::Expired);
        };

        if !codes_match(&stored_code, submitted_code) {
            warn!(
                identifier = %mask_identifier(identifier),
                attempts,
                max_attempts = self.config.max_verify_attempts,
                "incorrect code"
            );
            return Err(OtpError::InvalidCode);
        }

        self.clear_challenge(&code_key, &attempts_key).await?;
        info!(identifier = %mask_identifier(identifier), "challenge verified");
        Ok(())
    }

    /// Verification attempts left for an identifier's live challenge
    pub async fn remaining_attempts(&self, identifier: &str) -> OtpResult<i64> {
        let used = self
            .store
            .get(&attempts_key(identifier))
            .await?
            .and_then(|count| count.parse::<i64>().ok())
            .unwrap_or(0);

        Ok((self.config.max_verify_attempts - used).max(0))
    }

    async fn clear_challenge(&self, code_key: &str, attempts_key: &str) -> OtpResult<()> {
        self.store.delete(code_key).await?;
        self.store.delete(attempts_key).await?;
        Ok(())
    }
}

fn code_key(identifier: &str) -> String {
    format!("{OTP_KEY_PREFIX}{}", sanitize_identifier(identifier))
}

fn attempts_key(identifier: &str) -> String {
    format!("{ATTEMPTS_KEY_PREFIX}{}", sanitize_identifier(identifier))
}
