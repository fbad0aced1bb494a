use crate::error::Result;
use crate::policy::{self, Decision};
use crate::request::Request;
use crate::secret::Secret;
use std::sync::Arc;

/// Predicate deciding whether a request bypasses the engine entirely
///
/// Returns `true` if the request is excluded.
#[allow(clippy::type_complexity)]
pub type ExcludePredicate = Arc<dyn Fn(&dyn Request) -> bool + Send + Sync + 'static>;

/// Signed request method fix
///
/// Configured once and reused for every request. Cloning shares the secret
/// and the exclusion predicate, so a single instance can serve concurrent
/// requests.
///
/// Without a secret, signed requests are decoded but never verified. Any
/// client can then forge a payload; configure a secret unless the payload is
/// used for display only.
#[derive(Clone, Default)]
pub struct MethodFix {
    config_secret: Option<Secret>,
    config_exclude: Option<ExcludePredicate>,
}

impl MethodFix {
    /// Create a new method fix without secret or exclusions
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the shared secret used to verify signatures
    pub fn secret(&mut self, secret: impl Into<Secret>) -> &mut Self {
        self.config_secret = Some(secret.into());
        self
    }

    /// Configure the exclusion predicate
    ///
    /// Excluded requests are forwarded untouched; the signed request is not
    /// even parsed.
    pub fn exclude<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&dyn Request) -> bool + Send + Sync + 'static,
    {
        self.config_exclude = Some(Arc::new(predicate));
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

impl MethodFix {
    /// Decide what to do with a request without touching it
    ///
    /// Errors are fatal for the request: the signed request was not valid
    /// Base64URL or its payload was not JSON.
    pub fn decide<R: Request>(&self, request: &R) -> Result<Decision> {
        policy::decide(
            self.config_secret.as_ref(),
            self.config_exclude.as_ref(),
            request,
        )
    }

    /// Decide and apply the decision to the request
    ///
    /// On error the request is left as it was.
    pub fn process<R: Request>(&self, request: &mut R) -> Result<Decision> {
        let decision = self.decide(request)?;
        decision.clone().apply(request);
        Ok(decision)
    }

    /// Whether signatures are verified
    pub fn verifies_signatures(&self) -> bool {
        self.config_secret.is_some()
    }
}

impl std::fmt::Debug for MethodFix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodFix")
            .field("secret", &self.config_secret)
            .field("exclude", &self.config_exclude.is_some())
            .finish()
    }
}
