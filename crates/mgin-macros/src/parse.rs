//! Parsing for the `Bindable` derive.
//!
//! Turns a `DeriveInput` into a [`BindInput`]: the record's fields with their
//! declared sources, flags and a syntactic classification of their types.

use proc_macro2::Span;
use syn::{
    spanned::Spanned, Data, DeriveInput, Fields, GenericArgument, Generics, Ident, LitStr, Path,
    PathArguments, Type,
};

/// Source kinds accepted as `#[bind(...)]` keys.
pub const SOURCE_KINDS: [&str; 5] = ["path", "query", "form", "header", "cookie"];

/// Target shape of a field as far as the macro can tell from its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// `String`.
    Str,
    /// `Vec<u8>`, or `Bytes` written bare or as `bytes::Bytes`.
    Bytes,
    /// Signed integer. `None` means pointer width.
    Int(Option<u32>),
    /// Unsigned integer. `None` means pointer width.
    Uint(Option<u32>),
    /// `f32` or `f64`.
    Float(u32),
    /// `bool`.
    Bool,
    /// Anything else, with the type as written.
    Unsupported(String),
}

impl FieldShape {
    /// Classifies a field type.
    pub fn classify(ty: &Type) -> Self {
        let unsupported = || Self::Unsupported(type_name(ty));

        let Type::Path(type_path) = ty else {
            return unsupported();
        };
        if type_path.qself.is_some() {
            return unsupported();
        }
        let Some(segment) = type_path.path.segments.last() else {
            return unsupported();
        };

        let ident = segment.ident.to_string();
        match &segment.arguments {
            PathArguments::None => match ident.as_str() {
                "String" => Self::Str,
                "Bytes" if is_bytes_path(&type_path.path) => Self::Bytes,
                "bool" => Self::Bool,
                "i8" => Self::Int(Some(8)),
                "i16" => Self::Int(Some(16)),
                "i32" => Self::Int(Some(32)),
                "i64" => Self::Int(Some(64)),
                "i128" => Self::Int(Some(128)),
                "isize" => Self::Int(None),
                "u8" => Self::Uint(Some(8)),
                "u16" => Self::Uint(Some(16)),
                "u32" => Self::Uint(Some(32)),
                "u64" => Self::Uint(Some(64)),
                "u128" => Self::Uint(Some(128)),
                "usize" => Self::Uint(None),
                "f32" => Self::Float(32),
                "f64" => Self::Float(64),
                _ => unsupported(),
            },
            PathArguments::AngleBracketed(args) if ident == "Vec" && args.args.len() == 1 => {
                match args.args.first() {
                    Some(GenericArgument::Type(inner)) if is_u8(inner) => Self::Bytes,
                    _ => unsupported(),
                }
            }
            _ => unsupported(),
        }
    }

    /// Returns true if values of this shape can be bound.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// `Bytes` counts only when written bare or as `bytes::Bytes`, so a
/// same-named user type falls through to unsupported.
fn is_bytes_path(path: &Path) -> bool {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    match segments.as_slice() {
        [only] => only == "Bytes",
        [krate, name] => krate == "bytes" && name == "Bytes",
        _ => false,
    }
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.qself.is_none() && p.path.is_ident("u8"))
}

/// Renders a type the way it is written, without token spacing.
fn type_name(ty: &Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}

/// A declared `kind = "key"` pair.
#[derive(Debug, Clone)]
pub struct SourceDecl {
    /// One of [`SOURCE_KINDS`].
    pub kind: &'static str,
    /// Lookup key.
    pub key: String,
}

/// One field of the record.
#[derive(Debug)]
pub struct BindField {
    /// Field name.
    pub ident: Ident,
    /// Field type.
    pub ty: Type,
    /// Classified shape.
    pub shape: FieldShape,
    /// Declared sources, in declaration order.
    pub sources: Vec<SourceDecl>,
    /// `optional` flag.
    pub optional: bool,
    /// `ignore_error` flag.
    pub ignore_error: bool,
    /// `validate = "..."` rules.
    pub rules: Option<String>,
}

impl BindField {
    fn parse(field: &syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

        let mut sources: Vec<SourceDecl> = Vec::new();
        let mut optional = false;
        let mut ignore_error = false;
        let mut rules = None;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("optional") {
                    optional = true;
                    return Ok(());
                }
                if meta.path.is_ident("ignore_error") {
                    ignore_error = true;
                    return Ok(());
                }
                if meta.path.is_ident("validate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    rules = Some(lit.value());
                    return Ok(());
                }

                let Some(kind) = SOURCE_KINDS.iter().copied().find(|k| meta.path.is_ident(k)) else {
                    return Err(meta.error(
                        "unknown bind attribute, expected one of: path, query, form, header, \
                         cookie, optional, ignore_error, validate",
                    ));
                };
                let lit: LitStr = meta.value()?.parse()?;
                let key = lit.value();
                if key.is_empty() {
                    return Err(syn::Error::new(lit.span(), "source key must not be empty"));
                }
                if sources.iter().any(|s| s.kind == kind) {
                    return Err(meta.error(format!("duplicate `{kind}` source")));
                }
                sources.push(SourceDecl { kind, key });
                Ok(())
            })?;
        }

        let shape = FieldShape::classify(&field.ty);

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            shape,
            sources,
            optional,
            ignore_error,
            rules,
        })
    }
}

/// A parsed record.
#[derive(Debug)]
pub struct BindInput {
    /// Record name.
    pub ident: Ident,
    /// Record generics.
    pub generics: Generics,
    /// Path to the runtime crate.
    pub crate_path: Path,
    /// Fields in declaration order.
    pub fields: Vec<BindField>,
}

impl BindInput {
    /// Parses a derive input.
    ///
    /// Only structs with named fields (or no fields) are records.
    pub fn from_derive(input: DeriveInput) -> syn::Result<Self> {
        let crate_path = parse_crate_path(&input)?;

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(BindField::parse)
                    .collect::<syn::Result<Vec<_>>>()?,
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "Bindable cannot be derived for tuple structs",
                    ))
                }
            },
            Data::Enum(_) | Data::Union(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Bindable can only be derived for structs",
                ))
            }
        };

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            crate_path,
            fields,
        })
    }
}

/// Reads `#[bind(crate = "...")]` from the container, defaulting to `::mgin_bind`.
fn parse_crate_path(input: &DeriveInput) -> syn::Result<Path> {
    let mut crate_path = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                crate_path = Some(lit.parse::<Path>()?);
                Ok(())
            } else {
                Err(meta.error("unknown container attribute, expected `crate`"))
            }
        })?;
    }

    Ok(crate_path.unwrap_or_else(|| {
        let mut path = Path::from(Ident::new("mgin_bind", Span::call_site()));
        path.leading_colon = Some(Default::default());
        path
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(FieldShape::classify(&parse_quote!(String)), FieldShape::Str);
        assert_eq!(FieldShape::classify(&parse_quote!(std::string::String)), FieldShape::Str);
        assert_eq!(FieldShape::classify(&parse_quote!(i16)), FieldShape::Int(Some(16)));
        assert_eq!(FieldShape::classify(&parse_quote!(usize)), FieldShape::Uint(None));
        assert_eq!(FieldShape::classify(&parse_quote!(f32)), FieldShape::Float(32));
        assert_eq!(FieldShape::classify(&parse_quote!(bool)), FieldShape::Bool);
    }

    #[test]
    fn test_classify_bytes() {
        assert_eq!(FieldShape::classify(&parse_quote!(Vec<u8>)), FieldShape::Bytes);
        assert_eq!(FieldShape::classify(&parse_quote!(bytes::Bytes)), FieldShape::Bytes);
        assert_eq!(FieldShape::classify(&parse_quote!(::bytes::Bytes)), FieldShape::Bytes);
        assert_eq!(FieldShape::classify(&parse_quote!(Bytes)), FieldShape::Bytes);
    }

    #[test]
    fn test_classify_foreign_bytes_type() {
        assert_eq!(
            FieldShape::classify(&parse_quote!(wire::Bytes)),
            FieldShape::Unsupported("wire::Bytes".into())
        );
        assert!(!FieldShape::classify(&parse_quote!(my::codec::Bytes)).is_supported());
    }

    #[test]
    fn test_classify_unsupported() {
        assert_eq!(
            FieldShape::classify(&parse_quote!(Vec<String>)),
            FieldShape::Unsupported("Vec<String>".into())
        );
        assert_eq!(
            FieldShape::classify(&parse_quote!(Option<i32>)),
            FieldShape::Unsupported("Option<i32>".into())
        );
        assert!(!FieldShape::classify(&parse_quote!(&'static str)).is_supported());
    }

    #[test]
    fn test_parse_field_attributes() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(path = "id", validate = "gt=0")]
                id: i64,
                #[bind(query = "active", optional, ignore_error)]
                active: bool,
                computed: String,
            }
        };
        let parsed = BindInput::from_derive(input).unwrap();

        assert_eq!(parsed.fields.len(), 3);
        let id = &parsed.fields[0];
        assert_eq!(id.sources[0].kind, "path");
        assert_eq!(id.sources[0].key, "id");
        assert_eq!(id.rules.as_deref(), Some("gt=0"));
        assert!(!id.optional);

        let active = &parsed.fields[1];
        assert!(active.optional);
        assert!(active.ignore_error);

        assert!(parsed.fields[2].sources.is_empty());
    }

    #[test]
    fn test_multiple_kinds_are_kept_in_order() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(query = "q")]
                #[bind(path = "p")]
                id: u32,
            }
        };
        let parsed = BindInput::from_derive(input).unwrap();
        let kinds: Vec<_> = parsed.fields[0].sources.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ["query", "path"]);
    }

    #[test]
    fn test_rejects_empty_key() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(query = "")]
                q: String,
            }
        };
        let err = BindInput::from_derive(input).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_rejects_duplicate_kind() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(query = "a", query = "b")]
                q: String,
            }
        };
        assert!(BindInput::from_derive(input).is_err());
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(body = "x")]
                q: String,
            }
        };
        let err = BindInput::from_derive(input).unwrap_err();
        assert!(err.to_string().contains("unknown bind attribute"));
    }

    #[test]
    fn test_rejects_non_records() {
        let tuple: DeriveInput = parse_quote!(struct Id(u64););
        assert!(BindInput::from_derive(tuple).is_err());

        let en: DeriveInput = parse_quote!(enum Mode { A, B });
        assert!(BindInput::from_derive(en).is_err());
    }

    #[test]
    fn test_crate_path() {
        let input: DeriveInput = parse_quote! {
            #[bind(crate = "mgin::bind")]
            struct Req {}
        };
        let parsed = BindInput::from_derive(input).unwrap();
        let path = &parsed.crate_path;
        assert_eq!(quote::quote!(#path).to_string(), "mgin :: bind");

        let input: DeriveInput = parse_quote!(struct Unit;);
        let parsed = BindInput::from_derive(input).unwrap();
        let path = &parsed.crate_path;
        assert_eq!(quote::quote!(#path).to_string(), ":: mgin_bind");
        assert!(parsed.fields.is_empty());
    }
}
