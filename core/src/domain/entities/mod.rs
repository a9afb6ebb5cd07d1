//! Domain entities

pub mod api_key;
pub mod challenge;

pub use api_key::{ApiKeyRecord, KeyStatus};
pub use challenge::OtpChallenge;
