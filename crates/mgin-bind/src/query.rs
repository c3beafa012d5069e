//! Query string reader.

use crate::RequestContext;

impl RequestContext {
    /// Reads a query string value.
    ///
    /// Returns the first value when the key is repeated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mgin_bind::RequestContext;
    ///
    /// let ctx = RequestContext::builder()
    ///     .uri("/search?q=rust+lang&tag=a&tag=b")
    ///     .build();
    ///
    /// assert_eq!(ctx.query_value("q").as_deref(), Some("rust lang"));
    /// assert_eq!(ctx.query_value("tag").as_deref(), Some("a"));
    /// assert_eq!(ctx.query_values("tag"), vec!["a", "b"]);
    /// assert_eq!(ctx.query_value("page"), None);
    /// ```
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Returns every value given for `name`, in order.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query_pairs()
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns all decoded query pairs. Parsed once per request.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        self.query.get_or_init(|| {
            let raw = self.uri.query().unwrap_or("");
            serde_urlencoded::from_str(raw).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "undecodable query string treated as empty");
                Vec::new()
            })
        })
    }

    /// Returns the raw, undecoded query string.
    #[must_use]
    pub fn raw_query(&self) -> Option<&str> {
        self.uri.query()
    }
}

#[cfg(test)]
mod tests {
    use crate::RequestContext;

    fn ctx(uri: &'static str) -> RequestContext {
        RequestContext::builder().uri(uri).build()
    }

    #[test]
    fn test_percent_decoding() {
        let ctx = ctx("/?name=Hello%20World&q=rust%2Blang");

        assert_eq!(ctx.query_value("name").as_deref(), Some("Hello World"));
        assert_eq!(ctx.query_value("q").as_deref(), Some("rust+lang"));
    }

    #[test]
    fn test_empty_value_is_found() {
        let ctx = ctx("/?token=&flag");

        assert_eq!(ctx.query_value("token").as_deref(), Some(""));
        assert_eq!(ctx.query_value("flag").as_deref(), Some(""));
    }

    #[test]
    fn test_no_query_string() {
        let ctx = ctx("/users");

        assert!(ctx.query_pairs().is_empty());
        assert_eq!(ctx.raw_query(), None);
        assert_eq!(ctx.query_value("anything"), None);
    }

    #[test]
    fn test_query_is_parsed_once() {
        let ctx = ctx("/?a=1");

        assert!(ctx.query.get().is_none());
        let first = ctx.query_pairs().as_ptr();
        let second = ctx.query_pairs().as_ptr();
        assert_eq!(first, second);
    }
}
