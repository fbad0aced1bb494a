//! Decision policy: whether, and how, a request gets rewritten

use crate::error::Result;
use crate::method_fix::ExcludePredicate;
use crate::payload::{Payload, decode_payload};
use crate::request::{
    RETRIEVAL_METHOD, Request, SIGNED_REQUEST_ATTRIBUTE, SIGNED_REQUEST_PARAM, SUBMISSION_METHOD,
};
use crate::secret::Secret;
use crate::signature::{Verdict, verify_with_payload};
use crate::token::SignedRequest;

/// What should happen to a request
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Forward the request untouched
    NoChange,
    /// Rewrite the method and attach the decoded payload
    ///
    /// `payload` is `None` when the signed request had no payload part.
    Mutate {
        method: &'static str,
        payload: Option<Payload>,
    },
}

impl Decision {
    fn mutate(payload: Option<Payload>) -> Self {
        Decision::Mutate {
            method: RETRIEVAL_METHOD,
            payload,
        }
    }

    /// Whether the request is rewritten
    pub fn is_mutate(&self) -> bool {
        matches!(self, Decision::Mutate { .. })
    }

    /// Decoded payload that will be attached, if any
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Decision::Mutate { payload, .. } => payload.as_ref(),
            Decision::NoChange => None,
        }
    }

    /// Apply the decision to a request
    ///
    /// `Mutate` sets the method and the `facebook.signed_request` attribute.
    /// `NoChange` leaves the request as it is.
    pub fn apply<R: Request + ?Sized>(self, request: &mut R) {
        if let Decision::Mutate { method, payload } = self {
            request.set_method(method);
            request.set_attribute(SIGNED_REQUEST_ATTRIBUTE, payload.map(Payload::into_value));
        }
    }
}

/// Decide what to do with a request
///
/// Only `POST` requests carrying a `signed_request` parameter are candidates.
/// Without a secret the payload is trusted as-is; with one it must verify.
pub(crate) fn decide<R: Request>(
    secret: Option<&Secret>,
    exclude: Option<&ExcludePredicate>,
    request: &R,
) -> Result<Decision> {
    if exclude.is_some_and(|excluded| excluded(request as &dyn Request)) {
        tracing::debug!(path = request.path(), "Request excluded");
        return Ok(Decision::NoChange);
    }

    if request.method() != SUBMISSION_METHOD {
        return Ok(Decision::NoChange);
    }

    let Some(token) = request.param(SIGNED_REQUEST_PARAM) else {
        return Ok(Decision::NoChange);
    };

    // A token without payload part still rewrites the method
    let (verdict, payload) = match secret {
        Some(secret) => verify_with_payload(secret, token)?,
        None => {
            let payload = SignedRequest::parse(token)
                .payload()
                .map(decode_payload)
                .transpose()?;
            (Verdict::Unverified, payload)
        }
    };

    if !verdict.is_accepted() {
        tracing::debug!(path = request.path(), "Signed request rejected");
        return Ok(Decision::NoChange);
    }

    tracing::debug!(
        path = request.path(),
        ?verdict,
        has_payload = payload.is_some(),
        "Rewriting signed request to {RETRIEVAL_METHOD}"
    );

    Ok(Decision::mutate(payload))
}
