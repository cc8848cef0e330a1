//! SHA-256 smoke check for seeded password hashes

use sha2::{Digest, Sha256};

pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Whether `input` hashes to `expected` (hex, case-insensitive)
pub fn matches(input: &str, expected: &str) -> bool {
    sha256_hex(input).eq_ignore_ascii_case(expected.trim())
}
