//! Delivery provider module
//!
//! Outbound delivery implementations for sending one-time codes to end
//! users:
//!
//! - **Mock**: console output for development and testing
//! - **Twilio**: SMS via the Twilio Messages REST API
//! - **Custom API**: generic JSON messaging provider with basic auth
//!
//! Ordinary delivery failure is reported through the receipt, never as
//! an error; the providers only fail construction, on bad configuration.

pub mod custom_api;
pub mod mock;
pub mod twilio;

pub use custom_api::CustomApiDeliverySender;
pub use mock::MockDeliverySender;
pub use twilio::TwilioDeliverySender;

use tracing::warn;
use vg_core::services::delivery::DeliverySender;
use vg_shared::config::AppConfig;

/// Create a delivery sender based on configuration
///
/// Returns the provider named by the configuration, falling back to the
/// mock implementation when the provider is unknown or its settings are
/// unusable.
pub fn create_delivery_sender(config: &AppConfig) -> Box<dyn DeliverySender> {
    match config.delivery.provider.as_str() {
        "mock" => Box::new(MockDeliverySender::new()),
        "twilio" => {
            match TwilioDeliverySender::new(
                config.delivery.twilio.clone(),
                config.otp.issuer_name.clone(),
            ) {
                Ok(sender) => Box::new(sender),
                Err(e) => {
                    warn!("Failed to initialize Twilio delivery: {}. Falling back to mock", e);
                    Box::new(MockDeliverySender::new())
                }
            }
        }
        "custom" => {
            match CustomApiDeliverySender::new(
                config.delivery.custom_api.clone(),
                config.otp.issuer_name.clone(),
            ) {
                Ok(sender) => Box::new(sender),
                Err(e) => {
                    warn!(
                        "Failed to initialize custom API delivery: {}. Falling back to mock",
                        e
                    );
                    Box::new(MockDeliverySender::new())
                }
            }
        }
        other => {
            warn!("Unknown delivery provider '{}', using mock implementation", other);
            Box::new(MockDeliverySender::new())
        }
    }
}

/// Message body carrying a code to the recipient
pub(crate) fn code_message(issuer_name: &str, code: &str) -> String {
    format!("Your {} verification code is: {}", issuer_name, code)
}
