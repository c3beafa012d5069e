//! Procedural macros for mgin.
//!
//! This crate provides `#[derive(Bindable)]`, which turns a plain struct into
//! a destination record for `mgin_bind`. Use it through `mgin_bind::Bindable`
//! or `mgin::prelude`, not directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use mgin_bind::Bindable;
//!
//! #[derive(Default, Bindable)]
//! struct CreateSession {
//!     #[bind(form = "user", validate = "required,max=64")]
//!     user: String,
//!     #[bind(form = "remember", optional)]
//!     remember: bool,
//!     #[bind(header = "user-agent", optional)]
//!     user_agent: String,
//! }
//! ```
//!
//! # Macro Expansion
//!
//! The derive:
//!
//! 1. Classifies each field type (`String`, `Vec<u8>`, `Bytes`, `bool`,
//!    integers, floats, or unsupported). Classification is by name only:
//!    `Bytes` means `bytes::Bytes` when written bare or as `bytes::Bytes`,
//!    and any other path ending in `Bytes` is unsupported
//! 2. Emits a `static` schema listing every field with its sources and flags
//! 3. Emits index-based setters and getters over the record's fields

mod bindable;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `mgin_bind::Bindable` for a struct with named fields.
///
/// # Field Attributes
///
/// - `path = "key"`, `query = "key"`, `form = "key"`, `header = "key"`,
///   `cookie = "key"`: where the value is read from. A field normally
///   declares one. If several kinds are declared, the first of
///   path, query, form, header, cookie wins.
/// - `optional`: an absent value is not an error when validating.
/// - `ignore_error`: conversion errors are ignored by read-only binds.
/// - `validate = "rules"`: rules checked by `RuleValidator`.
///
/// Fields without `#[bind]` are left untouched by binding.
///
/// # Container Attributes
///
/// - `crate = "path"`: path to the runtime crate, `::mgin_bind` by default.
///   Use `#[bind(crate = "mgin::bind")]` when depending on the `mgin`
///   facade only.
///
/// # Errors
///
/// Enums, unions and tuple structs are rejected at compile time, as are
/// empty source keys, repeated source kinds and unknown attributes.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bindable::expand_bindable(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
