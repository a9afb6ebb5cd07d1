//! OTP lifecycle manager
//!
//! Owns one-time code generation, TTL-bound storage, attempt-limited
//! verification, and lockout.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::{IssuedChallenge, OtpService};
