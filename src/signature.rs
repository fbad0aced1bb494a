//! Signature verification for signed requests
//!
//! The MAC is computed over the *encoded* payload part exactly as it appears
//! in the token, then compared with the decoded signature part. Both sides are
//! rendered as lowercase hex and compared in constant time.

use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::payload::{Payload, decode_payload};
use crate::secret::Secret;
use crate::token::{DELIMITER, SignedRequest};
use crate::utils::base64url;

use constant_time_eq::constant_time_eq;
use serde_json::Value;

/// Outcome of checking a signed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Signature and algorithm match
    Valid,
    /// Signature or algorithm mismatch, or no payload part
    Invalid,
    /// No secret configured, nothing was checked
    Unverified,
}

impl Verdict {
    /// Whether the request may be trusted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Valid | Verdict::Unverified)
    }
}

/// Verify a signed request against a shared secret
///
/// Mismatches are reported as [`Verdict::Invalid`]. Malformed input is an
/// error: a signature or payload part that is not Base64URL, or a payload
/// that is not JSON, never turns into a verdict.
pub fn verify(secret: &Secret, token: &str) -> Result<Verdict> {
    verify_with_payload(secret, token).map(|(verdict, _)| verdict)
}

/// Verify a signed request and hand back the payload decoded on the way
///
/// The payload is `None` only when the token has no payload part.
pub(crate) fn verify_with_payload(
    secret: &Secret,
    token: &str,
) -> Result<(Verdict, Option<Payload>)> {
    let parts = SignedRequest::parse(token);
    let Some(payload_part) = parts.payload() else {
        tracing::warn!("Signed request has no payload part");
        return Ok((Verdict::Invalid, None));
    };

    let observed = hex::encode(base64url::decode(parts.signature())?);

    let payload = decode_payload(payload_part)?;
    let algorithm = payload.algorithm().and_then(Algorithm::from_declared);

    let expected = Algorithm::HmacSha256.hex_digest(secret.as_bytes(), payload_part.as_bytes());

    let signature_matches = observed.len() == expected.len()
        && constant_time_eq(observed.as_bytes(), expected.as_bytes());

    let verdict = match (algorithm, signature_matches) {
        (Some(_), true) => {
            tracing::debug!("Signed request signature verified");
            Verdict::Valid
        }
        (None, _) => {
            tracing::warn!(
                algorithm = ?payload.algorithm(),
                "Signed request declares an unsupported algorithm"
            );
            Verdict::Invalid
        }
        (Some(_), false) => {
            tracing::warn!("Signed request signature mismatch");
            Verdict::Invalid
        }
    };

    Ok((verdict, Some(payload)))
}

/// Build a signed request for `payload`
///
/// The payload is serialized as compact JSON and is expected to carry an
/// `algorithm` member of `HMAC-SHA256` if it is meant to verify.
pub fn sign(secret: &Secret, payload: &Value) -> String {
    let payload_part = base64url::encode(payload.to_string().as_bytes());
    let signature = Algorithm::HmacSha256.digest(secret.as_bytes(), payload_part.as_bytes());

    format!(
        "{}{DELIMITER}{payload_part}",
        base64url::encode(&signature)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    const SECRET: &str = "3d94b435641d85bd3ec5da171cdabaf0";
    const SIGNATURE: &str = "QCd8WudFOVM8xp05tKs9AwNYCkbF2io8Hn7PoiTdK7k";
    const PAYLOAD: &str = "eyJhbGdvcml0aG0iOiJITUFDLVNIQTI1NiIsImlzc3VlZF9hdCI6MTMxNzQwMzc0OCwidXNlciI6eyJjb3VudHJ5IjoidXMiLCJsb2NhbGUiOiJlbl9VUyIsImFnZSI6eyJtaW4iOjAsIm1heCI6MTJ9fX0";

    fn secret() -> Secret {
        Secret::from(SECRET)
    }

    #[test]
    fn test_verify_valid() {
        let token = format!("{SIGNATURE}.{PAYLOAD}");
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Valid);
    }

    #[test]
    fn test_verify_wrong_signature() {
        let token = format!("1234567.{PAYLOAD}");
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = format!("{SIGNATURE}.{PAYLOAD}");
        let wrong = Secret::from("wrong-secret");
        assert_eq!(verify(&wrong, &token).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_verify_without_payload_part() {
        assert_eq!(verify(&secret(), "nothing").unwrap(), Verdict::Invalid);
        assert_eq!(verify(&secret(), SIGNATURE).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_verify_invalid_signature_encoding_is_an_error() {
        let token = format!("not*base64.{PAYLOAD}");
        assert!(matches!(verify(&secret(), &token), Err(Error::Decode(_))));
    }

    #[test]
    fn test_verify_invalid_payload_is_an_error() {
        let payload_part = base64url::encode(b"not json");
        let token = format!("{SIGNATURE}.{payload_part}");
        assert!(matches!(
            verify(&secret(), &token),
            Err(Error::PayloadParse(_))
        ));
    }

    #[test]
    fn test_verify_signs_encoded_payload_text() {
        // Same JSON, different encoding of the payload part: padding changes
        // the signed text, so the original signature no longer matches.
        let token = format!("{SIGNATURE}.{PAYLOAD}=");
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_verify_rejects_other_algorithms_with_matching_digest() {
        for algorithm in ["HMAC-SHA384", "HS256", "none", ""] {
            let token = sign(&secret(), &json!({ "algorithm": algorithm, "user_id": "1" }));
            assert_eq!(
                verify(&secret(), &token).unwrap(),
                Verdict::Invalid,
                "algorithm {algorithm:?} should be rejected"
            );
        }

        let token = sign(&secret(), &json!({ "user_id": "1" }));
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_verify_algorithm_is_case_insensitive() {
        let token = sign(&secret(), &json!({ "algorithm": "hmac-sha256" }));
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Valid);
    }

    #[test]
    fn test_sign_reproduces_reference_signature() {
        let payload = crate::payload::decode_payload(PAYLOAD).unwrap();
        let token = sign(&secret(), payload.as_value());
        assert_eq!(verify(&secret(), &token).unwrap(), Verdict::Valid);
        assert!(token.contains('.'));
    }

    #[test]
    fn test_verify_non_object_payload_is_invalid() {
        for payload in [json!([1, 2]), json!("HMAC-SHA256"), json!(42)] {
            let token = sign(&secret(), &payload);
            assert_eq!(
                verify(&secret(), &token).unwrap(),
                Verdict::Invalid,
                "payload {payload} should be rejected"
            );
        }
    }

    #[test]
    fn test_verify_with_payload_returns_decoded_payload() {
        let token = format!("{SIGNATURE}.{PAYLOAD}");
        let (verdict, payload) = verify_with_payload(&secret(), &token).unwrap();
        assert_eq!(verdict, Verdict::Valid);
        assert_eq!(payload.unwrap().get("issued_at"), Some(&json!(1317403748)));

        let (verdict, payload) = verify_with_payload(&secret(), "nothing").unwrap();
        assert_eq!(verdict, Verdict::Invalid);
        assert_eq!(payload, None);
    }

    #[test]
    fn test_sign_with_empty_secret() {
        let empty = Secret::from("");
        let token = sign(&empty, &json!({ "algorithm": "HMAC-SHA256" }));
        let (signature, _) = token.split_once('.').unwrap();
        assert_eq!(base64url::decode(signature).unwrap().len(), 32);
        assert_eq!(verify(&empty, &token).unwrap(), Verdict::Valid);
    }

    #[test]
    fn test_verdict_is_accepted() {
        assert!(Verdict::Valid.is_accepted());
        assert!(Verdict::Unverified.is_accepted());
        assert!(!Verdict::Invalid.is_accepted());
    }
}
