//! [`Request`] for [`::http::Request`]
//!
//! Parameters are not read from the body here: bodies are streams and the
//! engine is synchronous. The server layer buffers the body and inserts a
//! [`FormParams`] extension before calling the engine. Attributes are stored
//! as extensions as well.

use crate::request::{Request, SIGNED_REQUEST_ATTRIBUTE};
use ::http::header::CONTENT_TYPE;
use serde_json::Value;
use std::collections::HashMap;
use url::form_urlencoded;

/// Submitted parameters of a request
///
/// Built from the query string and an `application/x-www-form-urlencoded`
/// body. Body parameters win over query parameters of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(HashMap<String, String>);

impl FormParams {
    /// Parse an urlencoded body
    pub fn parse(body: &[u8]) -> Self {
        Self(form_urlencoded::parse(body).into_owned().collect())
    }

    /// Parse the query string and the body
    pub fn from_query_and_body(query: Option<&str>, body: &[u8]) -> Self {
        let mut params: HashMap<String, String> = query
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        params.extend(form_urlencoded::parse(body).into_owned());
        Self(params)
    }

    /// Parameters of `request`, with `body` being its buffered body
    ///
    /// The body only counts when it is form data: an
    /// `application/x-www-form-urlencoded` content type, or a `POST` without
    /// any content type. Other bodies leave just the query string.
    pub fn from_request<B>(request: &::http::Request<B>, body: &[u8]) -> Self {
        let body = if has_form_body(request) { body } else { &[] };
        Self::from_query_and_body(request.uri().query(), body)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

fn has_form_body<B>(request: &::http::Request<B>) -> bool {
    match request.headers().get(CONTENT_TYPE) {
        Some(content_type) => content_type
            .to_str()
            .ok()
            .and_then(|value| value.split(';').next())
            .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_MEDIA_TYPE)),
        None => ::http::Request::method(request) == ::http::Method::POST,
    }
}

/// Attributes set by the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(HashMap<String, Option<Value>>);

impl Attributes {
    /// Attribute value, `None` if unset or set to the empty marker
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

/// Decoded signed request payload, for handlers to extract directly
///
/// `None` when the signed request had no payload part.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequestPayload(pub Option<Value>);

impl<B> Request for ::http::Request<B> {
    fn method(&self) -> &str {
        ::http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.extensions()
            .get::<FormParams>()
            .and_then(|params| params.get(name))
    }

    fn set_method(&mut self, method: &str) {
        match ::http::Method::from_bytes(method.as_bytes()) {
            Ok(method) => *self.method_mut() = method,
            Err(e) => tracing::warn!("Ignoring invalid method {method:?}: {e}"),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Option<Value>) {
        if name == SIGNED_REQUEST_ATTRIBUTE {
            self.extensions_mut()
                .insert(SignedRequestPayload(value.clone()));
        }

        let extensions = self.extensions_mut();
        if extensions.get::<Attributes>().is_none() {
            extensions.insert(Attributes::default());
        }
        if let Some(attributes) = extensions.get_mut::<Attributes>() {
            attributes.0.insert(name.to_string(), value);
        }
    }
}
