use verimail_signing::transcode::{decode, encode};
use verimail_signing::TranscodeError;

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn roundtrip_email() {
    let encoded = encode("alice@example.com");
    assert_eq!(decode(&encoded).unwrap(), "alice@example.com");
}

#[test]
fn roundtrip_empty_string() {
    let encoded = encode("");
    assert_eq!(encoded, "");
    assert_eq!(decode(&encoded).unwrap(), "");
}

#[test]
fn roundtrip_contains_separator() {
    // The default codec separator must survive transcoding untouched.
    let input = "payload:with:separators";
    assert_eq!(decode(&encode(input)).unwrap(), input);
}

#[test]
fn roundtrip_unicode() {
    let input = "bücher@bücher.example + 日本語";
    assert_eq!(decode(&encode(input)).unwrap(), input);
}

// ── Output alphabet ──────────────────────────────────────────────

#[test]
fn encoded_output_is_url_safe() {
    let encoded = encode("subject?a=b&c=d/e+f#anchor");
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=')));
}

// ── Decode failures ──────────────────────────────────────────────

#[test]
fn decode_rejects_malformed_base64() {
    let err = decode("%%%not-base64%%%").unwrap_err();
    assert!(matches!(err, TranscodeError::InvalidBase64(_)));
}

#[test]
fn decode_rejects_non_utf8_payload() {
    use base64::{engine::general_purpose::URL_SAFE, Engine};
    let encoded = URL_SAFE.encode([0xff, 0xfe, 0xfd]);
    let err = decode(&encoded).unwrap_err();
    assert!(matches!(err, TranscodeError::InvalidUtf8(_)));
}

#[test]
fn decode_rejects_truncated_segment() {
    let mut encoded = encode("alice@example.com");
    encoded.pop();
    assert!(decode(&encoded).is_err());
}
