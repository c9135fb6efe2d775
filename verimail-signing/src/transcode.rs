//! Reversible URL-safe encoding of link segments.
//!
//! Emails and tokens travel inside path segments of the verification link,
//! so both are wrapped in padded URL-safe base64. Encoding is infallible;
//! decoding a segment that did not come from [`encode`] fails with
//! [`TranscodeError`], which callers must treat as "link unusable", not as
//! a programming error.

use base64::{engine::general_purpose::URL_SAFE, Engine};

use crate::error::{TranscodeError, TranscodeResult};

/// Encodes plaintext into a transport-safe link segment.
pub fn encode(plain: &str) -> String {
    URL_SAFE.encode(plain.as_bytes())
}

/// Decodes a link segment produced by [`encode`].
///
/// # Errors
///
/// Returns [`TranscodeError`] if the segment is not valid URL-safe base64
/// or does not decode to UTF-8 text.
pub fn decode(encoded: &str) -> TranscodeResult<String> {
    let bytes = URL_SAFE.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}
