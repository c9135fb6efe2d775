//! Timestamped token signing with HMAC-SHA256.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::{SignError, SignResult};

type HmacSha256 = Hmac<Sha256>;

/// Default character joining payload, timestamp, and authentication code.
pub const DEFAULT_SEPARATOR: char = ':';

/// The URL-safe base64 alphabet (RFC 4648 §5), including padding.
///
/// The separator must not be drawn from this alphabet or the signed string
/// cannot be split back unambiguously.
pub const URL_SAFE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=";

/// Signs opaque payloads with a wall-clock timestamp and an HMAC-SHA256
/// authentication code, and verifies them back.
///
/// The signing key is derived once at construction: `SHA-256(salt || key)`
/// when a salt is configured (namespacing this use of the key from any
/// other), the raw key otherwise. The codec is immutable after
/// construction and safe to share across threads.
pub struct SignedTokenCodec {
    derived_key: Vec<u8>,
    separator: char,
}

impl SignedTokenCodec {
    /// Creates a codec from the deployment signing key.
    pub fn new(key: &[u8], salt: Option<&str>, separator: char) -> Self {
        let derived_key = match salt {
            Some(salt) => {
                let mut hasher = Sha256::new();
                hasher.update(salt.as_bytes());
                hasher.update(key);
                hasher.finalize().to_vec()
            }
            None => key.to_vec(),
        };
        Self {
            derived_key,
            separator,
        }
    }

    /// Signs a payload at the current wall-clock time.
    #[must_use]
    pub fn sign(&self, payload: &str) -> String {
        self.sign_at(payload, chrono::Utc::now().timestamp())
    }

    /// Signs a payload with an explicit issue timestamp (seconds since
    /// epoch). Used by tests and by callers that need deterministic output.
    #[must_use]
    pub fn sign_at(&self, payload: &str, issued_at: i64) -> String {
        let sep = self.separator;
        let stamped = format!("{payload}{sep}{issued_at}");
        let mac = self.mac_of(&stamped);
        format!("{stamped}{sep}{mac}")
    }

    /// Verifies a signed token and returns the payload.
    ///
    /// # Errors
    ///
    /// - [`SignError::BadSignature`] if the structure is broken or the
    ///   authentication code does not match (tampering).
    /// - [`SignError::Expired`] if the code matches but the token is older
    ///   than `max_age`. The authenticated payload is carried inside.
    pub fn unsign(&self, signed: &str, max_age: Option<Duration>) -> SignResult<String> {
        self.unsign_at(signed, max_age, chrono::Utc::now().timestamp())
    }

    /// Verifies against an explicit "now" (seconds since epoch).
    pub fn unsign_at(
        &self,
        signed: &str,
        max_age: Option<Duration>,
        now: i64,
    ) -> SignResult<String> {
        // The rightmost two separators delimit the timestamp and the MAC;
        // the payload itself may contain the separator.
        let (stamped, mac_b64) = signed
            .rsplit_once(self.separator)
            .ok_or(SignError::BadSignature)?;
        let (payload, timestamp) = stamped
            .rsplit_once(self.separator)
            .ok_or(SignError::BadSignature)?;

        let mac_bytes = URL_SAFE_NO_PAD
            .decode(mac_b64)
            .map_err(|_| SignError::BadSignature)?;

        let mut mac = HmacSha256::new_from_slice(&self.derived_key)
            .map_err(|_| SignError::BadSignature)?;
        mac.update(stamped.as_bytes());
        // verify_slice is constant-time in the MAC comparison.
        mac.verify_slice(&mac_bytes)
            .map_err(|_| SignError::BadSignature)?;

        // Only trust the timestamp once the MAC has checked out.
        let issued_at: i64 = timestamp.parse().map_err(|_| SignError::BadSignature)?;

        if let Some(max_age) = max_age {
            let age_secs = now - issued_at;
            if age_secs > max_age.as_secs() as i64 {
                return Err(SignError::Expired {
                    payload: payload.to_string(),
                    age_secs,
                });
            }
        }

        Ok(payload.to_string())
    }

    fn mac_of(&self, stamped: &str) -> String {
        // new_from_slice accepts any key length for SHA-256.
        let mut mac = HmacSha256::new_from_slice(&self.derived_key)
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(stamped.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}
