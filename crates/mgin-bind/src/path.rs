//! Path parameter reader.

use crate::{PathParams, RequestContext};

impl RequestContext {
    /// Reads a path parameter captured by the router.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mgin_bind::RequestContext;
    ///
    /// let ctx = RequestContext::builder()
    ///     .uri("/users/42")
    ///     .path_param("id", "42")
    ///     .build();
    ///
    /// assert_eq!(ctx.path_value("id").as_deref(), Some("42"));
    /// assert_eq!(ctx.path_value("name"), None);
    /// ```
    #[must_use]
    pub fn path_value(&self, name: &str) -> Option<String> {
        self.path_params.get(name).map(str::to_owned)
    }

    /// Returns all captured path parameters.
    #[must_use]
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }
}

#[cfg(test)]
mod tests {
    use crate::{PathParams, RequestContext};

    #[test]
    fn test_path_value_without_params() {
        let ctx = RequestContext::builder().uri("/static").build();

        assert!(ctx.path_params().is_empty());
        assert_eq!(ctx.path_value("id"), None);
    }

    #[test]
    fn test_path_values_are_not_decoded_again() {
        let params: PathParams = [("file", "a%20b")].into_iter().collect();
        let ctx = RequestContext::builder().path_params(params).build();

        assert_eq!(ctx.path_value("file").as_deref(), Some("a%20b"));
    }
}
