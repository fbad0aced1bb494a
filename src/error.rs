//! Errors for sigfix
//!
//! Only malformed input is an error. A signature or algorithm mismatch is not:
//! it surfaces as [`Verdict::Invalid`](crate::Verdict::Invalid) and leaves the
//! request untouched.

use thiserror::Error;

/// sigfix Errors
///
/// Both variants are fatal for the request being processed. Callers should
/// treat them like any other request-processing failure, never as an
/// untrusted-but-acceptable request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Base64URL decoding failed: {0}")]
    Decode(String),

    #[error("JSON parsing failed: {0}")]
    PayloadParse(String),
}

/// Result type alias for sigfix operations
pub type Result<T> = std::result::Result<T, Error>;
