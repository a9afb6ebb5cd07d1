//! # VerifyGate Core
//!
//! Core business logic and domain layer for the VerifyGate backend.
//! This crate contains the domain entities, the key-value store contract,
//! the quota and OTP lifecycle services, and the error types that form
//! the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
pub use store::{KeyValueStore, MemoryStore, StoreError, StoreOp, StoreResult};
