//! Header reader.

use crate::RequestContext;

impl RequestContext {
    /// Reads a request header by case-insensitive name.
    ///
    /// Returns the first value when the header is repeated. Values that are
    /// not visible ASCII are treated as absent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mgin_bind::RequestContext;
    ///
    /// let ctx = RequestContext::builder()
    ///     .header("x-request-id", "abc-123")
    ///     .build();
    ///
    /// assert_eq!(ctx.header_value("X-Request-Id").as_deref(), Some("abc-123"));
    /// assert_eq!(ctx.header_value("x-missing"), None);
    /// ```
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    /// Returns the `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}
