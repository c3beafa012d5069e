//! JSON body reading.
//!
//! The JSON path shares the binder's error contract: decoding failures and
//! validation failures are both bad requests.

use serde::de::DeserializeOwned;

use crate::{BindError, RequestContext, Validator};

impl RequestContext {
    /// Deserializes the request body as JSON.
    ///
    /// The `Content-Type` header is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Json`] if the body is empty or is not valid JSON
    /// for `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mgin_bind::RequestContext;
    /// use http::Method;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct CreateUser {
    ///     name: String,
    ///     email: String,
    /// }
    ///
    /// let ctx = RequestContext::builder()
    ///     .method(Method::POST)
    ///     .body(r#"{"name": "Alice", "email": "alice@example.com"}"#)
    ///     .build();
    ///
    /// let user: CreateUser = ctx.read_json().unwrap();
    /// assert_eq!(user.name, "Alice");
    /// assert_eq!(user.email, "alice@example.com");
    /// ```
    pub fn read_json<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        if self.body.is_empty() {
            return Err(BindError::Json("empty request body".to_owned()));
        }

        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::debug!(error = %e, "JSON body rejected");
            BindError::Json(e.to_string())
        })
    }

    /// Deserializes the request body as JSON and checks it with `validator`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Json`] on a decoding failure and
    /// [`BindError::Validation`] if the decoded value is rejected.
    pub fn read_and_validate_json<T, V>(&self, validator: &V) -> Result<T, BindError>
    where
        T: DeserializeOwned,
        V: Validator<T> + ?Sized,
    {
        let value = self.read_json()?;
        validator.validate(&value)?;
        Ok(value)
    }
}
