//! Algorithm support for signed requests
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm a signed request may declare
///
/// Only HMAC-SHA256 is supported. Anything else a payload declares is
/// rejected before the signature is even looked at, which rules out
/// algorithm-confusion downgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    HmacSha256,
}

impl Algorithm {
    /// Parse the `algorithm` member of a payload
    ///
    /// Matching is case-insensitive: the declared name is upper-cased and
    /// must then equal `HMAC-SHA256` exactly.
    pub fn from_declared(declared: &str) -> Option<Self> {
        if declared.to_uppercase() == Algorithm::HmacSha256.as_str() {
            Some(Algorithm::HmacSha256)
        } else {
            None
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HmacSha256 => "HMAC-SHA256",
        }
    }

    /// Raw message authentication code for `message`
    pub(crate) fn digest(&self, secret: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::HmacSha256 => {
                let mut mac =
                    HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Message authentication code for `message` as lowercase hex
    pub(crate) fn hex_digest(&self, secret: &[u8], message: &[u8]) -> String {
        hex::encode(self.digest(secret, message))
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
