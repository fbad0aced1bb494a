//! Base64URL encoding/decoding
//!
//! Signed requests are encoded with the URL-safe alphabet and usually without
//! padding. Decoding is lenient in the same way common signers are: `-`/`_`
//! are mapped back to `+`/`/`, missing padding is restored and non-zero
//! trailing bits in the final group are accepted. Anything else that is not
//! Base64 is rejected.

use crate::error::{Error, Result};
use base64::{
    Engine, alphabet,
    engine::{
        DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::URL_SAFE_NO_PAD,
    },
};

/// Standard alphabet, tolerant of trailing bits and of any padding.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a Base64URL string to bytes
pub fn decode(input: &str) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut normalized: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    LENIENT_STANDARD
        .decode(&normalized)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Encode bytes to an unpadded Base64URL string
pub fn encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}
