//! Utility functions shared across server modules

pub mod phone;

pub use phone::{is_valid_identifier, mask_identifier, sanitize_identifier};
