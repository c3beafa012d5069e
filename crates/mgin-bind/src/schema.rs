//! Record schemas.
//!
//! A [`Schema`] is the per-type side table describing every field of a
//! destination record: its target [`Shape`], where its value comes from and
//! which behavior flags apply. Schemas are normally generated by
//! `#[derive(Bindable)]` and live in a `static`, so they are resolved once per
//! record type and shared by every bind of that type.

use std::fmt;

use crate::{BindError, Value};

/// Request location a field value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Path parameters captured by the router.
    Path,
    /// Query string parameters.
    Query,
    /// Form body values (URL-encoded or multipart), falling back to the query string.
    Form,
    /// Request headers.
    Header,
    /// Cookies from the `Cookie` header.
    Cookie,
}

impl SourceKind {
    /// Order in which declared sources are considered when a field declares
    /// more than one.
    pub const PRECEDENCE: [Self; 5] = [
        Self::Path,
        Self::Query,
        Self::Form,
        Self::Header,
        Self::Cookie,
    ];

    /// Returns the attribute key used to declare this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Form => "form",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target shape of a field, which alone drives conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `String`.
    Str,
    /// `Vec<u8>` or `Bytes`: the raw bytes of the value.
    Bytes,
    /// Signed integer of the given bit width.
    Int {
        /// Bit width (8 to 128).
        bits: u32,
    },
    /// Unsigned integer of the given bit width.
    Uint {
        /// Bit width (8 to 128).
        bits: u32,
    },
    /// Floating point of the given bit width.
    Float {
        /// Bit width (32 or 64).
        bits: u32,
    },
    /// `bool`.
    Bool,
    /// Any other type. Binding such a field fails with "not implemented".
    Unsupported(&'static str),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Uint { bits } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// A declared `(source kind, key)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    /// Where to read from.
    pub kind: SourceKind,
    /// Lookup name within that location.
    pub key: &'static str,
}

impl Source {
    /// Creates a source declaration.
    #[must_use]
    pub const fn new(kind: SourceKind, key: &'static str) -> Self {
        Self { kind, key }
    }
}

/// Binding metadata for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name.
    pub name: &'static str,
    /// Target shape.
    pub shape: Shape,
    /// Declared sources in declaration order. Normally exactly one.
    pub sources: &'static [Source],
    /// An absent value is not an error when validating.
    pub optional: bool,
    /// Conversion errors are swallowed in read-only binds.
    pub ignore_error: bool,
    /// Rule expression consumed by [`RuleValidator`](crate::RuleValidator).
    pub rules: Option<&'static str>,
}

impl FieldSpec {
    /// Creates metadata for a field with no sources and no flags.
    #[must_use]
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            sources: &[],
            optional: false,
            ignore_error: false,
            rules: None,
        }
    }

    /// Resolves the source this field is bound from.
    ///
    /// The first kind in [`SourceKind::PRECEDENCE`] that the field declares
    /// wins; later declarations are ignored. Returns `None` for fields with no
    /// binding metadata.
    #[must_use]
    pub fn source(&self) -> Option<Source> {
        SourceKind::PRECEDENCE.iter().find_map(|kind| {
            self.sources
                .iter()
                .find(|source| source.kind == *kind)
                .copied()
        })
    }
}

/// Binding metadata for a whole record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Record type name, used in diagnostics.
    pub type_name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Creates a schema.
    #[must_use]
    pub const fn new(type_name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { type_name, fields }
    }

    /// Looks a field up by its Rust name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

/// A destination record that can be populated from a request.
///
/// Implemented by `#[derive(Bindable)]`. A hand-written implementation must
/// keep `assign` and `value` indices in sync with the order of
/// `schema().fields`.
pub trait Bindable {
    /// Returns the record's schema.
    fn schema() -> &'static Schema;

    /// Stores a converted value into the field at `index`.
    fn assign(&mut self, index: usize, value: Value) -> Result<(), BindError>;

    /// Reads the current value of the field at `index`.
    ///
    /// Returns `None` for fields whose shape is unsupported.
    fn value(&self, index: usize) -> Option<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_precedence_first_declared_kind_wins() {
        static SOURCES: [Source; 2] = [
            Source::new(SourceKind::Query, "q"),
            Source::new(SourceKind::Path, "p"),
        ];
        let field = FieldSpec {
            sources: &SOURCES,
            ..FieldSpec::new("id", Shape::Int { bits: 64 })
        };

        assert_eq!(field.source(), Some(Source::new(SourceKind::Path, "p")));
    }

    #[test]
    fn test_no_sources() {
        let field = FieldSpec::new("computed", Shape::Str);
        assert_eq!(field.source(), None);
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(Shape::Int { bits: 8 }.to_string(), "i8");
        assert_eq!(Shape::Uint { bits: 64 }.to_string(), "u64");
        assert_eq!(Shape::Float { bits: 32 }.to_string(), "f32");
        assert_eq!(Shape::Unsupported("Vec<String>").to_string(), "Vec<String>");
    }

    #[test]
    fn test_schema_field_lookup() {
        static FIELDS: [FieldSpec; 2] = [
            FieldSpec::new("a", Shape::Str),
            FieldSpec::new("b", Shape::Bool),
        ];
        let schema = Schema::new("Pair", &FIELDS);

        let (index, field) = schema.field("b").unwrap();
        assert_eq!(index, 1);
        assert_eq!(field.shape, Shape::Bool);
        assert!(schema.field("c").is_none());
    }
}
