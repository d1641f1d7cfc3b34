//! Shared-secret authentication for the search routes.
//!
//! Provides constant-time token comparison and master-key header extraction.

use axum::http::HeaderMap;

/// Header carrying the shared secret.
pub const MASTER_KEY_HEADER: &str = "x-master-key";

/// Every path starting with this prefix requires the master key.
pub const PROTECTED_PREFIX: &str = "/buscar";

/// Body detail returned with a 403.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: Invalid MASTER_KEY";

/// Validates a provided token against the expected token using constant-time comparison.
///
/// This prevents timing attacks by ensuring the comparison takes the same amount
/// of time regardless of where (or if) tokens differ.
///
/// Returns `false` if either token is empty.
pub fn validate_token(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    if provided.is_empty() || expected.is_empty() {
        return false;
    }

    let len_match = provided.len() == expected.len();

    // XOR accumulator: if any byte differs, result will be non-zero
    let mut diff: u8 = 0;
    for (a, b) in provided.iter().zip(expected.iter()) {
        diff |= a ^ b;
    }

    len_match && diff == 0
}

/// Reads the master key header, if present and valid UTF-8.
pub fn extract_master_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(MASTER_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

pub fn requires_master_key(path: &str) -> bool {
    path.starts_with(PROTECTED_PREFIX)
}

/// A request is authorized only when a secret is configured and the
/// provided one matches it.
pub fn is_authorized(provided: Option<&str>, expected: Option<&str>) -> bool {
    match (provided, expected) {
        (Some(provided), Some(expected)) => validate_token(provided, expected),
        _ => false,
    }
}
