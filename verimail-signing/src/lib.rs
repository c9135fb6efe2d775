//! Token transcoding and signing for verimail.
//!
//! This crate holds the cryptographic half of the verification-link
//! lifecycle:
//! - [`transcode`] — reversible URL-safe encoding of link segments
//! - [`SignedTokenCodec`] — timestamped HMAC-SHA256 signing with
//!   constant-time verification
//! - [`TokenHasher`] — the user-bound base token that proves a link
//!   belongs to a specific account
//!
//! # Signed token format
//!
//! Signed tokens look like: `payload<sep>timestamp<sep>mac`
//!
//! The MAC is base64url(HMAC-SHA256) over `payload<sep>timestamp`, so the
//! timestamp is only trusted once the MAC has verified. A token whose MAC
//! does not match is tampered ([`SignError::BadSignature`]); a token whose
//! MAC matches but whose timestamp is too old is stale
//! ([`SignError::Expired`]). The two are distinct end-to-end: the expired
//! variant carries the authenticated payload so callers can still identify
//! the account for rate-limiting, while a tampered token is never trusted
//! for any purpose.

mod error;
mod signer;
pub mod transcode;
mod user_hash;

pub use error::{SignError, SignResult, TranscodeError, TranscodeResult};
pub use signer::{SignedTokenCodec, DEFAULT_SEPARATOR, URL_SAFE_ALPHABET};
pub use user_hash::TokenHasher;
