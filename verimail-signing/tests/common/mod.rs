//! Shared test helpers for signing tests.

#![allow(dead_code)]

use verimail_signing::{SignedTokenCodec, TokenHasher, DEFAULT_SEPARATOR};

pub const TEST_KEY: &[u8] = b"a-deployment-secret-for-tests";
pub const TEST_SALT: &str = "verify-email-tests";

/// Codec with the standard test key, salt, and separator.
pub fn test_codec() -> SignedTokenCodec {
    SignedTokenCodec::new(TEST_KEY, Some(TEST_SALT), DEFAULT_SEPARATOR)
}

/// Codec sharing the test key but with no salt.
pub fn unsalted_codec() -> SignedTokenCodec {
    SignedTokenCodec::new(TEST_KEY, None, DEFAULT_SEPARATOR)
}

/// Hasher with the standard test key and salt.
pub fn test_hasher() -> TokenHasher {
    TokenHasher::new(TEST_KEY, Some(TEST_SALT))
}
