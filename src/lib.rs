//! # sigfix - Signed Request Method Fix
//!
//! > Verify HMAC-signed requests and turn trusted `POST` submissions into `GET` requests.
//!
//! Canvas-style embedding platforms load an application by `POST`ing a form with a single
//! `signed_request` parameter to the application URL. Applications usually want to treat that
//! load like an ordinary page view. **sigfix** checks the signed request and, when it can be
//! trusted, rewrites the request method to `GET` and attaches the decoded payload as the
//! `facebook.signed_request` attribute.
//!
//! ## Signed Requests
//!
//! A signed request is two Base64URL parts joined by `.`:
//!
//! ```text
//! <signature>.<payload>
//!     │          │
//!     │          └─ JSON object, must declare "algorithm": "HMAC-SHA256"
//!     └─ HMAC-SHA256(secret, <payload> as encoded text)
//! ```
//!
//! Only the first `.` separates the parts. The MAC covers the *encoded* payload text, so the
//! payload is verified byte for byte as it was sent.
//!
//! ## Quick Start
//!
//! ```
//! use sigfix::{Env, MethodFix, Request, SIGNED_REQUEST_PARAM};
//!
//! let fix = MethodFix::new()
//!     .secret("3d94b435641d85bd3ec5da171cdabaf0")
//!     .exclude(|request| request.path().starts_with("/admin"))
//!     .build();
//!
//! let token = "QCd8WudFOVM8xp05tKs9AwNYCkbF2io8Hn7PoiTdK7k.eyJhbGdvcml0aG0iOiJITUFDLVNIQTI1NiIsImlzc3VlZF9hdCI6MTMxNzQwMzc0OCwidXNlciI6eyJjb3VudHJ5IjoidXMiLCJsb2NhbGUiOiJlbl9VUyIsImFnZSI6eyJtaW4iOjAsIm1heCI6MTJ9fX0";
//! let mut request = Env::post("/canvas").with_param(SIGNED_REQUEST_PARAM, token);
//!
//! let decision = fix.process(&mut request)?;
//! assert!(decision.is_mutate());
//! assert_eq!(request.method(), "GET");
//! # Ok::<(), sigfix::Error>(())
//! ```
//!
//! ## Decisions
//!
//! A request is rewritten only if all of these hold:
//!
//! - it is not excluded by the configured predicate,
//! - its method is `POST` and it carries a `signed_request` parameter,
//! - no secret is configured, or the signature verifies.
//!
//! Otherwise the decision is [`Decision::NoChange`] and the request is forwarded as it came in.
//!
//! ## Errors
//!
//! Mismatches are not errors. A wrong signature or an unsupported algorithm yields
//! [`Verdict::Invalid`] and [`Decision::NoChange`]. Malformed input is: a part that is not
//! Base64URL fails with [`Error::Decode`], a payload that is not JSON with
//! [`Error::PayloadParse`]. Treat both as a failed request, never as an untrusted-but-acceptable
//! one.
//!
//! ## Security
//!
//! ### Running Without A Secret
//!
//! Without a secret the payload is decoded but never verified, and anyone can forge it. A
//! signed request without payload part is still rewritten to `GET`, with an empty
//! `facebook.signed_request` attribute.
//!
//! ### Algorithm Confusion Prevention
//!
//! Only `HMAC-SHA256` is accepted (case-insensitively). Any other declared algorithm fails
//! verification even when the digest matches.
//!
//! ### Timing Attack Protection
//!
//! Signatures are compared with [`constant_time_eq`](https://crates.io/crates/constant_time_eq).
//!
//! ## Features
//!
//! - **`http`** (default): [`Request`] for `http::Request`, see [`http`].

// Core modules
pub mod error;
pub mod utils;

// Token handling
pub mod algorithm;
pub mod payload;
pub mod secret;
pub mod signature;
pub mod token;

// Decision policy and the request boundary
pub mod method_fix;
pub mod policy;
pub mod request;

#[cfg(feature = "http")]
pub mod http;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use method_fix::{ExcludePredicate, MethodFix};
pub use policy::Decision;
pub use request::{
    Env, RETRIEVAL_METHOD, Request, SIGNED_REQUEST_ATTRIBUTE, SIGNED_REQUEST_PARAM,
    SUBMISSION_METHOD,
};

pub use algorithm::Algorithm;
pub use error::{Error, Result};
pub use payload::{Payload, decode_payload};
pub use secret::Secret;
pub use signature::{Verdict, sign, verify};
pub use token::SignedRequest;
