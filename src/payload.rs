//! Payload decoding for signed requests

use crate::error::{Error, Result};
use crate::utils::base64url;
use serde_json::Value;

/// Member naming the algorithm the payload was signed with
const ALGORITHM_MEMBER: &str = "algorithm";

/// Decoded JSON payload of a signed request
///
/// The payload is usually an object, but any JSON value is accepted when
/// decoding. Accessors treat non-object payloads as having no members.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Value);

impl Payload {
    /// Declared signing algorithm, if present as a string
    pub fn algorithm(&self) -> Option<&str> {
        self.get(ALGORITHM_MEMBER).and_then(Value::as_str)
    }

    /// Look up a top-level member
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the underlying JSON value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Decode an encoded payload part into JSON
///
/// Numbers keep their exact text, so integers beyond 64 bits survive.
///
/// Returns [`Error::Decode`] for invalid Base64URL and [`Error::PayloadParse`]
/// when the decoded bytes are not JSON text.
pub fn decode_payload(payload_part: &str) -> Result<Payload> {
    let bytes = base64url::decode(payload_part)?;

    serde_json::from_slice(&bytes)
        .map(Payload)
        .map_err(|e| Error::PayloadParse(format!("Failed to parse payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYLOAD: &str = "eyJhbGdvcml0aG0iOiJITUFDLVNIQTI1NiIsImlzc3VlZF9hdCI6MTMxNzQwMzc0OCwidXNlciI6eyJjb3VudHJ5IjoidXMiLCJsb2NhbGUiOiJlbl9VUyIsImFnZSI6eyJtaW4iOjAsIm1heCI6MTJ9fX0";

    #[test]
    fn test_decode_payload() {
        let payload = decode_payload(PAYLOAD).unwrap();
        assert_eq!(
            payload.as_value(),
            &json!({
                "algorithm": "HMAC-SHA256",
                "issued_at": 1317403748,
                "user": {
                    "country": "us",
                    "locale": "en_US",
                    "age": { "min": 0, "max": 12 }
                }
            })
        );
        assert_eq!(payload.algorithm(), Some("HMAC-SHA256"));
        assert_eq!(payload.get("issued_at"), Some(&json!(1317403748)));
    }

    #[test]
    fn test_decode_payload_invalid_base64() {
        assert!(matches!(decode_payload("!!!"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_payload_invalid_json() {
        let encoded = base64url::encode(b"{not json");
        assert!(matches!(
            decode_payload(&encoded),
            Err(Error::PayloadParse(_))
        ));
        assert!(matches!(decode_payload(""), Err(Error::PayloadParse(_))));
    }

    #[test]
    fn test_decode_payload_invalid_utf8() {
        let encoded = base64url::encode(&[0x22, 0xff, 0xfe, 0x22]);
        assert!(matches!(
            decode_payload(&encoded),
            Err(Error::PayloadParse(_))
        ));
    }

    #[test]
    fn test_algorithm_missing_or_not_a_string() {
        let payload = Payload::from(json!({ "issued_at": 1 }));
        assert_eq!(payload.algorithm(), None);

        let payload = Payload::from(json!({ "algorithm": 256 }));
        assert_eq!(payload.algorithm(), None);

        let payload = Payload::from(json!(["algorithm"]));
        assert_eq!(payload.algorithm(), None);
    }

    #[test]
    fn test_non_object_payload_is_accepted() {
        let encoded = base64url::encode(b"[1,2,3]");
        let payload = decode_payload(&encoded).unwrap();
        assert_eq!(payload.into_value(), json!([1, 2, 3]));
    }

    #[test]
    fn test_decode_payload_keeps_big_integers() {
        let encoded = base64url::encode(
            br#"{"algorithm":"HMAC-SHA256","n":123456789012345678901234567890}"#,
        );
        let payload = decode_payload(&encoded).unwrap();
        assert_eq!(
            payload.get("n").map(Value::to_string).as_deref(),
            Some("123456789012345678901234567890")
        );
        assert_eq!(
            payload.into_value().to_string(),
            r#"{"algorithm":"HMAC-SHA256","n":123456789012345678901234567890}"#
        );
    }
}
