//! Tests for the quota manager service

#[cfg(test)]
mod service_tests;
