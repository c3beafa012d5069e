//! Form body reader.
//!
//! The body is parsed lazily on the first form lookup and the outcome,
//! success or failure, is memoized on the [`RequestContext`] for the rest of
//! the request. Only `POST`, `PUT` and `PATCH` bodies are parsed.
//! `multipart/form-data` bodies contribute their non-file parts, and only
//! those count against `max_multipart_memory`; URL-encoded
//! bodies contribute every pair; any other content type contributes nothing.
//!
//! A form lookup that misses the body falls back to the query string.

use bytes::Bytes;
use futures_util::FutureExt;
use http::{header, HeaderMap, Method};
use mime::Mime;
use multer::Multipart;
use std::io;

use crate::{BindConfig, BindError, RequestContext, SourceKind};

/// Pairs parsed out of a form body, in body order.
pub(crate) type FormPairs = Vec<(String, String)>;

impl RequestContext {
    /// Reads a form value.
    ///
    /// Body values take precedence over same-named query string values.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Source`] if the body could not be parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mgin_bind::RequestContext;
    /// use http::Method;
    ///
    /// let ctx = RequestContext::builder()
    ///     .method(Method::POST)
    ///     .uri("/login?next=/home&user=ignored")
    ///     .header("content-type", "application/x-www-form-urlencoded")
    ///     .body("user=alice&pass=s3cret")
    ///     .build();
    ///
    /// assert_eq!(ctx.form_value("user").unwrap().as_deref(), Some("alice"));
    /// assert_eq!(ctx.form_value("next").unwrap().as_deref(), Some("/home"));
    /// assert_eq!(ctx.form_value("missing").unwrap(), None);
    /// ```
    pub fn form_value(&self, name: &str) -> Result<Option<String>, BindError> {
        let body_value = self
            .form_pairs()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone());

        Ok(body_value.or_else(|| self.query_value(name)))
    }

    /// Returns every value parsed from the form body.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Source`] if the body could not be parsed.
    pub fn form_pairs(&self) -> Result<&[(String, String)], BindError> {
        self.form
            .get_or_init(|| parse_form(&self.method, &self.headers, &self.body, &self.config))
            .as_deref()
            .map_err(|message| BindError::source_failed(SourceKind::Form, message.clone()))
    }
}

fn parse_form(
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
    config: &BindConfig,
) -> Result<FormPairs, String> {
    if !matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        return Ok(Vec::new());
    }

    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return Ok(Vec::new());
    };
    let content_type = content_type
        .to_str()
        .map_err(|_| "invalid UTF-8 in Content-Type header".to_string())?;
    let mime: Mime = content_type
        .parse()
        .map_err(|e| format!("invalid Content-Type {content_type:?}: {e}"))?;

    match mime.essence_str().to_ascii_lowercase().as_str() {
        "application/x-www-form-urlencoded" => parse_urlencoded(body, config),
        "multipart/form-data" => parse_multipart(content_type, body, config),
        _ => {
            tracing::trace!(content_type, "form body ignored for content type");
            Ok(Vec::new())
        }
    }
}

fn parse_urlencoded(body: &Bytes, config: &BindConfig) -> Result<FormPairs, String> {
    if body.len() > config.max_form_size {
        return Err(format!(
            "form body too large: max {} bytes, got {} bytes",
            config.max_form_size,
            body.len()
        ));
    }

    serde_urlencoded::from_bytes(body).map_err(|e| e.to_string())
}

fn parse_multipart(content_type: &str, body: &Bytes, config: &BindConfig) -> Result<FormPairs, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "missing or invalid boundary in multipart Content-Type".to_string())?;

    // The body is already buffered, so every poll below completes immediately.
    let body = body.clone();
    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = Multipart::new(stream, boundary);

    // Only values kept in memory count against the limit; file parts are skipped.
    let mut in_memory = 0usize;
    let mut pairs = Vec::new();
    loop {
        let field = multipart
            .next_field()
            .now_or_never()
            .ok_or_else(stalled)?
            .map_err(|e| format!("multipart parse error: {e}"))?;
        let Some(field) = field else {
            break;
        };

        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let text = field
            .text()
            .now_or_never()
            .ok_or_else(stalled)?
            .map_err(|e| format!("multipart field {name:?}: {e}"))?;

        in_memory += text.len();
        if in_memory > config.max_multipart_memory {
            return Err(format!(
                "multipart form values too large: max {} bytes in memory",
                config.max_multipart_memory
            ));
        }
        pairs.push((name, text));
    }

    Ok(pairs)
}

fn stalled() -> String {
    "multipart body ended unexpectedly".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    const BOUNDARY: &str = "X-MGIN-BOUNDARY";

    fn multipart_body() -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             hello world\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             file contents\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"count\"\r\n\r\n\
             3\r\n\
             --{b}--\r\n",
            b = BOUNDARY
        )
    }

    fn multipart_ctx(body: String, config: BindConfig) -> RequestContext {
        RequestContext::builder()
            .method(Method::POST)
            .uri("/upload?title=from-query&page=2")
            .header(
                "content-type",
                &format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .config(config)
            .build()
    }

    #[test]
    fn test_urlencoded_values() {
        let ctx = RequestContext::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
            .body("name=hello+world&email=a%40b.c&name=second")
            .build();

        assert_eq!(ctx.form_value("name").unwrap().as_deref(), Some("hello world"));
        assert_eq!(ctx.form_value("email").unwrap().as_deref(), Some("a@b.c"));
        assert_eq!(ctx.form_pairs().unwrap().len(), 3);
    }

    #[test]
    fn test_multipart_non_file_parts() {
        let ctx = multipart_ctx(multipart_body(), BindConfig::default());

        assert_eq!(ctx.form_value("title").unwrap().as_deref(), Some("hello world"));
        assert_eq!(ctx.form_value("count").unwrap().as_deref(), Some("3"));
        assert_eq!(ctx.form_value("upload").unwrap(), None);
        assert_eq!(ctx.form_value("page").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_multipart_memory_limit() {
        let ctx = multipart_ctx(multipart_body(), BindConfig::default().max_multipart_memory(8));

        let err = ctx.form_value("title").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_multipart_file_parts_do_not_count_against_limit() {
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             hello\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"big.bin\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {file}\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
            file = "x".repeat(4096)
        );
        let ctx = multipart_ctx(body, BindConfig::default().max_multipart_memory(1024));

        assert_eq!(ctx.form_value("title").unwrap().as_deref(), Some("hello"));
        assert_eq!(ctx.form_value("upload").unwrap(), None);
    }

    #[test]
    fn test_multipart_without_boundary() {
        let ctx = RequestContext::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "multipart/form-data")
            .body("irrelevant")
            .build();

        let err = ctx.form_value("title").unwrap_err();
        assert!(matches!(
            err,
            BindError::Source {
                origin: SourceKind::Form,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_failure_is_memoized() {
        let ctx = RequestContext::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "multipart/form-data")
            .build();

        assert!(ctx.form_value("a").is_err());
        assert!(ctx.form.get().is_some());
        assert!(ctx.form_value("b").is_err());
    }

    #[test]
    fn test_get_body_is_not_parsed() {
        let ctx = RequestContext::builder()
            .method(Method::GET)
            .uri("/?q=query")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("q=body")
            .build();

        assert_eq!(ctx.form_value("q").unwrap().as_deref(), Some("query"));
        assert!(ctx.form_pairs().unwrap().is_empty());
    }

    #[test]
    fn test_other_content_type_yields_nothing() {
        let ctx = RequestContext::builder()
            .method(Method::PUT)
            .uri("/")
            .header("content-type", "application/json")
            .body(r#"{"a":1}"#)
            .build();

        assert_eq!(ctx.form_value("a").unwrap(), None);
    }

    #[test]
    fn test_urlencoded_size_limit() {
        let ctx = RequestContext::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(format!("a={}", "x".repeat(64)))
            .config(BindConfig::default().max_form_size(32))
            .build();

        assert!(ctx.form_value("a").is_err());
    }
}
