//! Webhook signature verification.
//!
//! The service signs every callback body with HMAC-SHA256 using the webhook
//! secret and sends the result as `sha256=<hex digest>`. Verification
//! recomputes the MAC over the exact raw bytes received and compares in
//! constant time through [`hmac::Mac::verify_slice`].

use crate::error::{Html2PdfError, Result};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Conventional header carrying the signature on webhook requests.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-signature";

const SIGNATURE_PREFIX: &str = "sha256=";

fn keyed_mac(secret: &str, body: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Html2PdfError::InvalidConfig(format!("webhook secret: {e}")))?;
    mac.update(body);
    Ok(mac)
}

/// Compute the `sha256=<hex>` signature for `body`.
///
/// Useful for tests and for services that relay callbacks.
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String> {
    let digest = keyed_mac(secret, body)?.finalize().into_bytes();
    Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)))
}

/// Check `signature` against `body` without parsing it.
///
/// Only the exact form produced by [`sign_payload`] is accepted: the
/// `sha256=` prefix followed by lowercase hex.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let hex_sig = signature
        .strip_prefix(SIGNATURE_PREFIX)
        .filter(|h| h.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')))
        .ok_or(Html2PdfError::InvalidSignature)?;
    let expected = hex::decode(hex_sig).map_err(|_| Html2PdfError::InvalidSignature)?;

    keyed_mac(secret, body)?
        .verify_slice(&expected)
        .map_err(|_| Html2PdfError::InvalidSignature)
}

/// Verify `signature` and deserialize `body` into `T`.
pub(crate) fn verify_and_parse<T: DeserializeOwned>(
    secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<T> {
    verify_signature(secret, body, signature)?;
    serde_json::from_slice(body).map_err(Html2PdfError::InvalidPayload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const SECRET: &str = "whsec_test";

    #[test]
    fn sign_has_prefix_and_hex_digest() {
        let sig = sign_payload(SECRET, b"{}").unwrap();
        assert!(sig.starts_with("sha256="));
        assert_eq!(sig.len(), "sha256=".len() + 64);
    }

    #[test]
    fn known_vector() {
        // RFC 4231 test case 2.
        let sig = sign_payload("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn valid_signature_parses() {
        let body = br#"{"jobId":"abc","status":"completed"}"#;
        let sig = sign_payload(SECRET, body).unwrap();
        let value: Value = verify_and_parse(SECRET, body, &sig).unwrap();
        assert_eq!(value, json!({"jobId": "abc", "status": "completed"}));
    }

    #[test]
    fn altered_body_is_rejected() {
        let sig = sign_payload(SECRET, br#"{"status":"completed"}"#).unwrap();
        let err = verify_signature(SECRET, br#"{"status":"failed"}"#, &sig).unwrap_err();
        assert!(matches!(err, Html2PdfError::InvalidSignature));
    }

    #[test]
    fn altered_signature_is_rejected() {
        let body = br#"{"status":"completed"}"#;
        let mut sig = sign_payload(SECRET, body).unwrap();
        let last = if sig.ends_with('0') { '1' } else { '0' };
        sig.pop();
        sig.push(last);
        assert!(matches!(
            verify_signature(SECRET, body, &sig).unwrap_err(),
            Html2PdfError::InvalidSignature
        ));
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        let body = b"{}";
        let digest = sign_payload(SECRET, body).unwrap();
        let bare = digest.trim_start_matches("sha256=");
        for sig in ["", "sha256=", "sha256=zz", bare, "sha1=abcd"] {
            assert!(
                matches!(
                    verify_signature(SECRET, body, sig).unwrap_err(),
                    Html2PdfError::InvalidSignature
                ),
                "accepted {sig:?}"
            );
        }
    }

    #[test]
    fn uppercase_hex_digest_is_rejected() {
        let body = b"{}";
        let sig = sign_payload(SECRET, body).unwrap();
        let upper = format!("sha256={}", sig["sha256=".len()..].to_ascii_uppercase());
        assert_ne!(upper, sig);
        assert!(matches!(
            verify_signature(SECRET, body, &upper).unwrap_err(),
            Html2PdfError::InvalidSignature
        ));
        verify_signature(SECRET, body, &sig).unwrap();
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = b"{}";
        let sig = sign_payload("other", body).unwrap();
        assert!(verify_signature(SECRET, body, &sig).is_err());
    }

    #[test]
    fn non_json_body_with_valid_signature_is_payload_error() {
        let body = b"not json";
        let sig = sign_payload(SECRET, body).unwrap();
        let err = verify_and_parse::<Value>(SECRET, body, &sig).unwrap_err();
        assert!(matches!(err, Html2PdfError::InvalidPayload(_)));
    }

    #[test]
    fn round_trip_equals_parsed_body() {
        let bodies: [&[u8]; 5] = [
            b"null",
            b"42",
            br#""text""#,
            br#"[1,2,{"a":true}]"#,
            br#"{"nested":{"list":[1.5,"x",null]},"unicode":"caf\u00e9"}"#,
        ];
        for body in bodies {
            let sig = sign_payload(SECRET, body).unwrap();
            let verified: Value = verify_and_parse(SECRET, body, &sig).unwrap();
            let parsed: Value = serde_json::from_slice(body).unwrap();
            assert_eq!(verified, parsed);
        }
    }
}
