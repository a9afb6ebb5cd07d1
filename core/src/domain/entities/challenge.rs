//! One-time code challenge entity.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};

/// Bytes of entropy behind an opaque challenge reference token
const REFERENCE_BYTES: usize = 4;

/// A live verification challenge for one identifier
///
/// The code and its attempts counter are persisted as two TTL-bound
/// store entries sharing one lifetime window; this type only carries the
/// freshly generated values between issuance and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// End-user identifier the code was issued for
    pub identifier: String,

    /// The secret digits
    pub code: String,
}

impl OtpChallenge {
    /// Create a challenge with a freshly generated code
    pub fn new(identifier: impl Into<String>, code_length: usize) -> Self {
        Self {
            identifier: identifier.into(),
            code: Self::generate_code(code_length),
        }
    }

    /// Generate a fixed-length numeric code from the OS random source
    ///
    /// Each digit is sampled independently, so the distribution is
    /// uniform over the full code space.
    pub fn generate_code(length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Generate an opaque reference token for an issued challenge
    pub fn generate_reference() -> String {
        let mut bytes = [0u8; REFERENCE_BYTES];
        OsRng.fill(&mut bytes[..]);
        hex::encode(bytes)
    }
}

/// Compare a stored code against a submitted one in constant time
///
/// Lengths are compared first; the byte comparison leaks no
/// partial-match timing information.
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.len() == submitted.len() && constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
