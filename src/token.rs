//! Splitting a signed request into its signature and payload parts

/// Separator between the encoded signature and the encoded payload
pub(crate) const DELIMITER: char = '.';

/// A signed request split into its two encoded parts
///
/// Nothing is decoded at this stage. The payload part is kept exactly as it
/// appears in the token because the signature is computed over the encoded
/// text, not over the decoded JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedRequest<'a> {
    signature: &'a str,
    payload: Option<&'a str>,
}

impl<'a> SignedRequest<'a> {
    /// Split a token on the first `.`
    ///
    /// Everything after the first delimiter is the payload, even if it
    /// contains further delimiters. Without a delimiter the whole token is
    /// the signature part and there is no payload.
    pub fn parse(token: &'a str) -> Self {
        match token.split_once(DELIMITER) {
            Some((signature, payload)) => Self {
                signature,
                payload: Some(payload),
            },
            None => Self {
                signature: token,
                payload: None,
            },
        }
    }

    /// Encoded signature part
    pub fn signature(&self) -> &'a str {
        self.signature
    }

    /// Encoded payload part, if the token had a delimiter
    pub fn payload(&self) -> Option<&'a str> {
        self.payload
    }
}
