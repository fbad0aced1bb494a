//! Request abstraction consumed by the decision policy

use serde_json::Value;
use std::collections::HashMap;

/// Parameter carrying the signed request
pub const SIGNED_REQUEST_PARAM: &str = "signed_request";

/// Attribute the decoded payload is stored under
pub const SIGNED_REQUEST_ATTRIBUTE: &str = "facebook.signed_request";

/// Method signed requests are submitted with
pub const SUBMISSION_METHOD: &str = "POST";

/// Method trusted submissions are rewritten to
pub const RETRIEVAL_METHOD: &str = "GET";

/// The view of an inbound request the engine needs
///
/// Implementations expose the method, the path (for exclusion predicates)
/// and submitted parameters, and accept the two mutations a
/// [`Decision`](crate::Decision) may ask for.
pub trait Request {
    /// HTTP method, e.g. `POST`
    fn method(&self) -> &str;

    /// Request path
    fn path(&self) -> &str;

    /// Submitted parameter by name
    fn param(&self, name: &str) -> Option<&str>;

    /// Replace the HTTP method
    fn set_method(&mut self, method: &str);

    /// Set an attribute; `None` marks it present but empty
    fn set_attribute(&mut self, name: &str, value: Option<Value>);
}

/// In-memory request environment
#[derive(Debug, Clone, PartialEq)]
pub struct Env {
    method: String,
    path: String,
    params: HashMap<String, String>,
    attributes: HashMap<String, Option<Value>>,
}

impl Env {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(SUBMISSION_METHOD, path)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RETRIEVAL_METHOD, path)
    }

    /// Add a submitted parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Attribute value, `None` if unset or set to the empty marker
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).and_then(Option::as_ref)
    }

    /// Whether an attribute has been set, including to the empty marker
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

impl Request for Env {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    fn set_method(&mut self, method: &str) {
        self.method = method.to_string();
    }

    fn set_attribute(&mut self, name: &str, value: Option<Value>) {
        self.attributes.insert(name.to_string(), value);
    }
}
