//! Cookie reader.
//!
//! Cookies are read from every `Cookie` header on the request, in order. When
//! a name appears more than once the first occurrence wins.

use http::header::COOKIE;

use crate::RequestContext;

/// Cookies sent with a request, in the order they were sent.
///
/// # Example
///
/// ```rust
/// use mgin_bind::RequestContext;
///
/// let ctx = RequestContext::builder()
///     .header("cookie", "session=abc123; theme=\"dark\"")
///     .build();
///
/// let cookies = ctx.cookies();
/// assert_eq!(cookies.get("session"), Some("abc123"));
/// assert_eq!(cookies.get("theme"), Some("dark"));
/// assert_eq!(cookies.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    pairs: Vec<(String, String)>,
}

impl Cookies {
    /// Creates an empty cookie jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn extend_from_header(&mut self, header_value: &str) {
        for cookie in header_value.split(';') {
            let Some((name, value)) = cookie.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.pairs
                .push((name.to_owned(), unquote(value.trim()).to_owned()));
        }
    }

    /// Returns the first value sent for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if a cookie named `name` was sent.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of cookies, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no cookies were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Strips one pair of surrounding double quotes.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

impl RequestContext {
    /// Reads a cookie value by name.
    #[must_use]
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookies().get(name).map(str::to_owned)
    }

    /// Parses every cookie sent with the request.
    #[must_use]
    pub fn cookies(&self) -> Cookies {
        let mut cookies = Cookies::new();
        for value in self.headers.get_all(COOKIE) {
            if let Ok(value) = value.to_str() {
                cookies.extend_from_header(value);
            }
        }
        cookies
    }
}
