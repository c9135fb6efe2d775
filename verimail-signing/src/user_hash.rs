//! User-bound base token hashing.
//!
//! The base token is an HMAC-SHA256 over an account's identifying fields
//! (id and email, fed in by the caller). Re-deriving it for the same
//! unchanged account yields a value the verifier accepts, so the token is
//! never persisted; whether the account has activated in the meantime is
//! checked separately against the stored record.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation context mixed into the key so base tokens can never
/// collide with the signed-token MAC computed from the same key and salt.
const KEY_CONTEXT: &str = "verimail.user-token";

/// Derives and checks user-bound base tokens.
pub struct TokenHasher {
    derived_key: Vec<u8>,
}

impl TokenHasher {
    /// Creates a hasher from the deployment signing key and optional salt.
    pub fn new(key: &[u8], salt: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(KEY_CONTEXT.as_bytes());
        if let Some(salt) = salt {
            hasher.update(salt.as_bytes());
        }
        hasher.update(key);
        Self {
            derived_key: hasher.finalize().to_vec(),
        }
    }

    /// Derives the base token for the given account fields.
    #[must_use]
    pub fn make_token(&self, fields: &[&str]) -> String {
        URL_SAFE_NO_PAD.encode(self.mac_bytes(fields))
    }

    /// Checks a presented token against the account fields in constant
    /// time. Malformed tokens simply fail the check.
    #[must_use]
    pub fn check_token(&self, fields: &[&str], token: &str) -> bool {
        let Ok(presented) = URL_SAFE_NO_PAD.decode(token) else {
            return false;
        };
        let mut mac = match HmacSha256::new_from_slice(&self.derived_key) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        Self::feed_fields(&mut mac, fields);
        mac.verify_slice(&presented).is_ok()
    }

    fn mac_bytes(&self, fields: &[&str]) -> Vec<u8> {
        // new_from_slice accepts any key length for SHA-256.
        let mut mac = HmacSha256::new_from_slice(&self.derived_key)
            .expect("HMAC-SHA256 accepts keys of any length");
        Self::feed_fields(&mut mac, fields);
        mac.finalize().into_bytes().to_vec()
    }

    fn feed_fields(mac: &mut HmacSha256, fields: &[&str]) {
        // NUL joins keep ["ab","c"] and ["a","bc"] distinct.
        for field in fields {
            mac.update(field.as_bytes());
            mac.update(&[0]);
        }
    }
}
