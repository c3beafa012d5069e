//! Expansion of `#[derive(Bindable)]`.
//!
//! Generates a `static` schema for the record plus index-based `assign` and
//! `value` methods. Index `i` always refers to the `i`-th named field.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Path};

use crate::parse::{BindField, BindInput, FieldShape};

/// Expands the derive.
pub fn expand_bindable(input: DeriveInput) -> syn::Result<TokenStream> {
    let input = BindInput::from_derive(input)?;
    let krate = &input.crate_path;
    let ident = &input.ident;
    let type_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_count = input.fields.len();
    let specs = input.fields.iter().map(|field| field_spec(krate, field));

    let assign_arms = input.fields.iter().enumerate().map(|(index, field)| {
        let name = &field.ident;
        let ty = &field.ty;
        let field_name = name.to_string();

        if field.shape.is_supported() {
            quote! {
                #index => {
                    self.#name = <#ty as #krate::FromValue>::from_value(value).ok_or_else(|| {
                        #krate::BindError::structural(
                            #type_name,
                            ::core::concat!("value does not fit field ", #field_name),
                        )
                    })?;
                    ::core::result::Result::Ok(())
                }
            }
        } else {
            quote! {
                #index => ::core::result::Result::Err(#krate::BindError::structural(
                    #type_name,
                    ::core::concat!("field ", #field_name, " has no textual representation"),
                )),
            }
        }
    });

    let value_arms = input
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.shape.is_supported())
        .map(|(index, field)| {
            let name = &field.ident;
            let ty = &field.ty;
            quote! {
                #index => ::core::option::Option::Some(
                    <#ty as #krate::IntoValue>::to_value(&self.#name)
                ),
            }
        });

    Ok(quote! {
        impl #impl_generics #krate::Bindable for #ident #ty_generics #where_clause {
            fn schema() -> &'static #krate::Schema {
                static FIELDS: [#krate::FieldSpec; #field_count] = [#(#specs),*];
                static SCHEMA: #krate::Schema = #krate::Schema {
                    type_name: #type_name,
                    fields: &FIELDS,
                };
                &SCHEMA
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                index: usize,
                value: #krate::Value,
            ) -> ::core::result::Result<(), #krate::BindError> {
                match index {
                    #(#assign_arms)*
                    _ => ::core::result::Result::Err(#krate::BindError::structural(
                        #type_name,
                        ::std::format!("no field at index {}", index),
                    )),
                }
            }

            #[allow(unused_variables)]
            fn value(&self, index: usize) -> ::core::option::Option<#krate::Value> {
                match index {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn field_spec(krate: &Path, field: &BindField) -> TokenStream {
    let name = field.ident.to_string();
    let shape = shape_tokens(krate, &field.shape);
    let optional = field.optional;
    let ignore_error = field.ignore_error;

    let sources = field.sources.iter().map(|source| {
        let kind = match source.kind {
            "path" => quote!(Path),
            "query" => quote!(Query),
            "form" => quote!(Form),
            "header" => quote!(Header),
            _ => quote!(Cookie),
        };
        let key = &source.key;
        quote! {
            #krate::Source { kind: #krate::SourceKind::#kind, key: #key }
        }
    });

    let rules = match &field.rules {
        Some(rules) => quote!(::core::option::Option::Some(#rules)),
        None => quote!(::core::option::Option::None),
    };

    quote! {
        #krate::FieldSpec {
            name: #name,
            shape: #shape,
            sources: &[#(#sources),*],
            optional: #optional,
            ignore_error: #ignore_error,
            rules: #rules,
        }
    }
}

fn shape_tokens(krate: &Path, shape: &FieldShape) -> TokenStream {
    match shape {
        FieldShape::Str => quote!(#krate::Shape::Str),
        FieldShape::Bytes => quote!(#krate::Shape::Bytes),
        FieldShape::Bool => quote!(#krate::Shape::Bool),
        FieldShape::Int(Some(bits)) => quote!(#krate::Shape::Int { bits: #bits }),
        FieldShape::Int(None) => quote!(#krate::Shape::Int { bits: ::core::primitive::isize::BITS }),
        FieldShape::Uint(Some(bits)) => quote!(#krate::Shape::Uint { bits: #bits }),
        FieldShape::Uint(None) => quote!(#krate::Shape::Uint { bits: ::core::primitive::usize::BITS }),
        FieldShape::Float(bits) => quote!(#krate::Shape::Float { bits: #bits }),
        FieldShape::Unsupported(name) => quote!(#krate::Shape::Unsupported(#name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_expansion_mentions_every_field() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                #[bind(path = "id")]
                id: i64,
                #[bind(cookie = "sid", optional)]
                session: String,
            }
        };
        let out = expand_bindable(input).unwrap().to_string();

        assert!(out.contains("Bindable for Req"));
        assert!(out.contains("SourceKind :: Path"));
        assert!(out.contains("SourceKind :: Cookie"));
        assert!(out.contains("\"sid\""));
        assert!(out.contains("static FIELDS"));
        assert!(out.contains("2usize"));
    }

    #[test]
    fn test_unsupported_field_has_no_value_arm() {
        let input: DeriveInput = parse_quote! {
            struct Req {
                tags: Vec<String>,
            }
        };
        let out = expand_bindable(input).unwrap().to_string();

        assert!(out.contains("Unsupported"));
        assert!(out.contains("\"Vec<String>\""));
        assert!(!out.contains("IntoValue"));
    }

    #[test]
    fn test_error_for_enum() {
        let input: DeriveInput = parse_quote!(enum E { A });
        assert!(expand_bindable(input).is_err());
    }
}
