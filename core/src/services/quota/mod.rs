//! API key quota manager
//!
//! Owns API key lifecycle (create/revoke/pause/update) and monthly
//! usage accounting with lazy period rollover and atomic increments.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::{AuthorizedKey, KeyUpdate, QuotaService};
