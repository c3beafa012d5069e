//! Request context providing access to request data.
//!
//! The [`RequestContext`] is the read-only view of one request that every
//! source reader works against. Derived data (the decoded query string and
//! the parsed form body) is computed on first use and cached for the
//! lifetime of the context.

use std::cell::OnceCell;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::form::FormPairs;
use crate::{BindConfig, BindError, PathParams, SourceKind};

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{PathParams, RequestContext};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = PathParams::new();
/// params.push("id", "123");
///
/// let ctx = RequestContext::new(
///     Method::GET,
///     Uri::from_static("/users/123?active=true"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.path_value("id").as_deref(), Some("123"));
/// assert_eq!(ctx.query_value("active").as_deref(), Some("true"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) path_params: PathParams,
    pub(crate) config: BindConfig,
    pub(crate) query: OnceCell<Vec<(String, String)>>,
    pub(crate) form: OnceCell<Result<FormPairs, String>>,
}

impl RequestContext {
    /// Creates a context with the default [`BindConfig`].
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: PathParams,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            config: BindConfig::default(),
            query: OnceCell::new(),
            form: OnceCell::new(),
        }
    }

    /// Creates a context from an `http::Request` whose body is already buffered.
    #[must_use]
    pub fn from_request(request: http::Request<Bytes>, path_params: PathParams) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body, path_params)
    }

    /// Returns a builder for constructing a context.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::new()
    }

    /// Replaces the binder configuration.
    #[must_use]
    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self.form = OnceCell::new();
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the binder configuration.
    #[must_use]
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Reads the raw value for `key` from the given location.
    ///
    /// `Ok(None)` means the key was not found. An empty string means it was
    /// found with an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Source`] if the location itself could not be
    /// read. Only the form body can fail this way.
    pub fn read(&self, kind: SourceKind, key: &str) -> Result<Option<String>, BindError> {
        match kind {
            SourceKind::Path => Ok(self.path_value(key)),
            SourceKind::Query => Ok(self.query_value(key)),
            SourceKind::Form => self.form_value(key),
            SourceKind::Header => Ok(self.header_value(key)),
            SourceKind::Cookie => Ok(self.cookie_value(key)),
        }
    }
}

/// Builder for constructing a [`RequestContext`].
///
/// Defaults to `GET /` with no headers, no body and no path parameters.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
    config: BindConfig,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. An unparsable URI leaves the current one in place.
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        Uri: TryFrom<U>,
    {
        match Uri::try_from(uri) {
            Ok(uri) => self.uri = Some(uri),
            Err(_) => tracing::debug!("ignoring unparsable request URI"),
        }
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a single header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn path_params(mut self, params: PathParams) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Sets the binder configuration.
    #[must_use]
    pub fn config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the request context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
            config: self.config,
            query: OnceCell::new(),
            form: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ctx = RequestContext::builder().build();

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.uri().path(), "/");
        assert!(ctx.headers().is_empty());
        assert!(ctx.body().is_empty());
        assert_eq!(ctx.config(), &BindConfig::default());
    }

    #[test]
    fn test_builder() {
        let ctx = RequestContext::builder()
            .method(Method::POST)
            .uri("/api/users?page=2")
            .header("content-type", "application/json")
            .body(r#"{"name": "Alice"}"#)
            .path_param("version", "v1")
            .config(BindConfig::new().strict_metadata(true))
            .build();

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.uri().path(), "/api/users");
        assert_eq!(ctx.content_type(), Some("application/json"));
        assert_eq!(ctx.path_value("version").as_deref(), Some("v1"));
        assert!(ctx.config().strict_metadata);
    }

    #[test]
    fn test_read_dispatch() {
        let ctx = RequestContext::builder()
            .uri("/items/7?sort=asc")
            .path_param("id", "7")
            .header("x-token", "t0k")
            .header("cookie", "lang=en")
            .build();

        assert_eq!(ctx.read(SourceKind::Path, "id").unwrap().as_deref(), Some("7"));
        assert_eq!(ctx.read(SourceKind::Query, "sort").unwrap().as_deref(), Some("asc"));
        assert_eq!(ctx.read(SourceKind::Form, "sort").unwrap().as_deref(), Some("asc"));
        assert_eq!(ctx.read(SourceKind::Header, "X-Token").unwrap().as_deref(), Some("t0k"));
        assert_eq!(ctx.read(SourceKind::Cookie, "lang").unwrap().as_deref(), Some("en"));
        assert_eq!(ctx.read(SourceKind::Cookie, "missing").unwrap(), None);
    }

    #[test]
    fn test_from_request() {
        let request = http::Request::builder()
            .method(Method::DELETE)
            .uri("/sessions/9")
            .body(Bytes::new())
            .unwrap();
        let ctx = RequestContext::from_request(request, [("sid", "9")].into_iter().collect());

        assert_eq!(ctx.method(), &Method::DELETE);
        assert_eq!(ctx.path_value("sid").as_deref(), Some("9"));
    }
}
