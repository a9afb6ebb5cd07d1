//! Phone identifier utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").unwrap());

/// Reduce an identifier to its digits for use in store keys
///
/// Formatting variants of the same number ("+1 (555) 123-4567",
/// "15551234567") must derive the same challenge keys.
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize an identifier by removing common formatting characters
pub fn normalize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if an identifier is a valid E.164 phone number
pub fn is_valid_identifier(identifier: &str) -> bool {
    let normalized = normalize_identifier(identifier);
    E164_REGEX.is_match(&normalized)
}

/// Mask an identifier for logging (show only the last 4 digits)
pub fn mask_identifier(identifier: &str) -> String {
    let digits = sanitize_identifier(identifier);
    if digits.len() >= 7 {
        format!("***{}", &digits[digits.len() - 4..])
    } else {
        "****".to_string()
    }
}
