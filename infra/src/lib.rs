//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the VerifyGate
//! application. It provides concrete implementations for the external
//! services the core depends on:
//!
//! - **Store**: Redis implementation of the core key-value store contract
//! - **Delivery**: outbound delivery providers (mock, Twilio, custom API)

pub mod delivery;
pub mod store;

pub use delivery::create_delivery_sender;
pub use store::RedisStore;

use vg_shared::config::AppConfig;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis store error
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Load application configuration from the environment
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok(); // Load .env file if present
    AppConfig::from_env()
}
