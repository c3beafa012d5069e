//! # mgin-bind
//!
//! Declarative request-to-struct binding.
//!
//! A destination record derives [`Bindable`] and annotates each field with
//! the request location its value comes from. Binding reads every field's
//! raw value, converts it to the field's type and stores it, stopping at the
//! first fatal error.
//!
//! ## Sources
//!
//! | Attribute | Location | Reader |
//! |-----------|----------|--------|
//! | `path = "id"` | Router path parameters | [`RequestContext::path_value`] |
//! | `query = "q"` | Query string, first value | [`RequestContext::query_value`] |
//! | `form = "name"` | Form body, then query string | [`RequestContext::form_value`] |
//! | `header = "X-Id"` | Headers, first value | [`RequestContext::header_value`] |
//! | `cookie = "sid"` | `Cookie` headers, first match | [`RequestContext::cookie_value`] |
//!
//! A field may also carry `optional`, `ignore_error` and a
//! `validate = "..."` rule expression (see [`RuleValidator`]). Fields with no
//! source are left untouched.
//!
//! Supported field types are `String`, `Vec<u8>`, `Bytes`, `bool`, all
//! integer widths and `f32`/`f64`. Any other type is accepted by the derive
//! but binding it fails with `501 Not Implemented`.
//!
//! ## Example
//!
//! ```rust
//! use mgin_bind::{Bindable, RequestContext};
//! use http::StatusCode;
//!
//! #[derive(Debug, Default, Bindable)]
//! struct ListOrders {
//!     #[bind(path = "customer", validate = "gt=0")]
//!     customer: u64,
//!     #[bind(query = "status", optional, validate = "omitempty,oneof=open closed")]
//!     status: String,
//!     #[bind(header = "x-request-id", optional)]
//!     request_id: String,
//! }
//!
//! let ctx = RequestContext::builder()
//!     .uri("/customers/17/orders?status=open")
//!     .path_param("customer", "17")
//!     .build();
//!
//! let mut req = ListOrders::default();
//! ctx.bind_and_validate(&mut req).unwrap();
//! assert_eq!(req.customer, 17);
//! assert_eq!(req.status, "open");
//!
//! let ctx = RequestContext::builder().uri("/customers/x/orders").path_param("customer", "x").build();
//! let err = ctx.bind_and_validate(&mut ListOrders::default()).unwrap_err();
//! assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
//! assert_eq!(err.field(), Some("customer"));
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`BindError`] whose [`status_code`](BindError::status_code)
//! is drawn from a fixed set:
//!
//! | Status | Cause |
//! |--------|-------|
//! | 400 | missing required value, conversion failure, unreadable form body, failed validation, bad JSON |
//! | 500 | the destination cannot be bound |
//! | 501 | a bound field has an unsupported type |

#![doc(html_root_url = "https://docs.rs/mgin-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Lets `#[derive(Bindable)]` expand to `::mgin_bind` paths inside this crate.
extern crate self as mgin_bind;

mod binder;
mod coerce;
mod config;
mod context;
mod cookie;
mod error;
mod form;
mod header;
mod json;
mod params;
mod path;
mod query;
mod schema;
mod validate;
mod value;

pub use binder::{bind, bind_and_validate, bind_and_validate_with, BindMode};
pub use coerce::{coerce, CoerceError};
pub use config::{BindConfig, DEFAULT_MAX_FORM_SIZE, DEFAULT_MAX_MULTIPART_MEMORY};
pub use context::{RequestContext, RequestContextBuilder};
pub use cookie::Cookies;
pub use error::{BindError, BindOutcome};
pub use params::PathParams;
pub use schema::{Bindable, FieldSpec, Schema, Shape, Source, SourceKind};
pub use validate::{FieldFailure, RuleValidator, ValidationError, Validator};
pub use value::{FromValue, IntoValue, Value};

pub use mgin_macros::Bindable;
