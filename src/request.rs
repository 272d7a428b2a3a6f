//! Incoming HTTP request type.
//!
//! One `Request` is built per matched route, owned exclusively by the task
//! handling that request, and threaded by value through every middleware
//! layer into the terminal handler. Nothing about it is shared; when the
//! handler returns, it is gone.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri};

/// An incoming HTTP request with its bound path parameters.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, uri, headers, body, params, extensions: Extensions::new() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The query string, if one was sent.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// The full request target as sent: path plus query string.
    pub fn target(&self) -> &str {
        self.uri
            .path_and_query()
            .map_or(self.uri.path(), |pq| pq.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/note/:id`, `req.param("id")` on `/note/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Request-scoped typed storage.
    ///
    /// A value inserted by an outer middleware is visible to every layer
    /// below it and to the terminal handler, because the request moves down
    /// the chain by value. Inner layers cannot hand anything back up this
    /// way — the request is consumed before the response travels out.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to [`extensions`](Request::extensions).
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
