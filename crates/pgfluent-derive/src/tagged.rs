//! Tagged derive macro implementation

use crate::common::syn_types::{NestedShape, nested_shape};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// Parsed `#[fluent(...)]` field attribute.
#[derive(Default)]
struct FieldAttr {
    column: Option<String>,
    unsettable: bool,
    nested: bool,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "unsettable" {
                attr.unsettable = true;
            } else if ident == "nested" {
                attr.nested = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                if value.value().trim().is_empty() {
                    return Err(syn::Error::new_spanned(value, "column name must not be empty"));
                }
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    &ident,
                    format!("unknown fluent attribute `{ident}`"),
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        Ok(attr)
    }
}

/// The `#[fluent(...)]` attribute of a field, if it has one.
fn field_attr(field: &syn::Field) -> Result<Option<FieldAttr>> {
    let mut found = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("fluent") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "only one #[fluent(...)] attribute per field",
            ));
        }
        found = Some(attr.parse_args::<FieldAttr>()?);
    }
    Ok(found)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Tagged cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Tagged can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Tagged can only be derived for structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    for field in fields {
        let Some(attr) = field_attr(field)? else {
            continue;
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let ty = &field.ty;

        if attr.nested {
            if attr.unsettable {
                return Err(syn::Error::new_spanned(
                    field,
                    "a nested field cannot be unsettable",
                ));
            }
            let tag = attr.column.unwrap_or_else(|| field_name.clone());
            descriptors.push(nested_descriptor(ident, &tag, &field_name, ty));
            continue;
        }

        let Some(tag) = attr.column else {
            return Err(syn::Error::new_spanned(
                field,
                "expected #[fluent(column = \"...\")]",
            ));
        };

        let kind = quote!(<#ty as ::pgfluent::Column>::KIND);
        let read = quote!(|s: &Self| ::pgfluent::Column::to_value(&s.#ident));
        let is_unset = quote!(|s: &Self| ::pgfluent::Column::is_unset(&s.#ident));

        descriptors.push(if attr.unsettable {
            quote! {
                ::pgfluent::FieldDescriptor::unsettable(#tag, #field_name, #kind, #read, #is_unset)
            }
        } else {
            quote! {
                ::pgfluent::FieldDescriptor::scalar(
                    #tag,
                    #field_name,
                    #kind,
                    #read,
                    #is_unset,
                    |s: &mut Self, v: ::pgfluent::Value| {
                        s.#ident = <#ty as ::pgfluent::Column>::from_value(v)?;
                        ::core::result::Result::Ok(())
                    },
                )
            }
        });
    }

    Ok(quote! {
        impl ::pgfluent::Tagged for #name {
            const FIELDS: &'static [::pgfluent::FieldDescriptor<Self>] = &[
                #(#descriptors),*
            ];
        }
    })
}

fn nested_descriptor(
    ident: &syn::Ident,
    tag: &str,
    field_name: &str,
    ty: &syn::Type,
) -> TokenStream {
    let (shape, base) = nested_shape(ty);
    let scanned = quote!(::pgfluent::scan_nested::<#base>(row)?);
    let value = match shape {
        NestedShape::Plain => scanned,
        NestedShape::Boxed => quote!(::std::boxed::Box::new(#scanned)),
        NestedShape::Optional => quote!(::core::option::Option::Some(#scanned)),
        NestedShape::OptionalBoxed => {
            quote!(::core::option::Option::Some(::std::boxed::Box::new(#scanned)))
        }
    };

    quote! {
        ::pgfluent::FieldDescriptor::nested(
            #tag,
            #field_name,
            |s: &mut Self, row: &::pgfluent::RowMap| {
                s.#ident = #value;
                ::core::result::Result::Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn untagged_fields_are_skipped() {
        let out = expand_str(parse_quote! {
            struct User {
                #[fluent(column = "id")]
                id: i64,
                cache: String,
            }
        });
        assert!(out.contains("\"id\""));
        assert!(!out.contains("cache"));
    }

    #[test]
    fn unsettable_fields_have_no_writer() {
        let out = expand_str(parse_quote! {
            struct User {
                #[fluent(column = "token", unsettable)]
                token: String,
            }
        });
        assert!(out.contains("FieldDescriptor :: unsettable"));
        assert!(!out.contains("from_value"));
    }

    #[test]
    fn nested_field_defaults_tag_to_field_name() {
        let out = expand_str(parse_quote! {
            struct Report {
                #[fluent(nested)]
                meta: Option<Box<RowMeta>>,
            }
        });
        assert!(out.contains("FieldDescriptor :: nested"));
        assert!(out.contains("\"meta\""));
        assert!(out.contains("scan_nested :: < RowMeta >"));
        assert!(out.contains("Box :: new"));
    }

    #[test]
    fn rejects_unknown_attribute() {
        let err = expand(parse_quote! {
            struct User {
                #[fluent(colum = "id")]
                id: i64,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown fluent attribute"));
    }

    #[test]
    fn rejects_scalar_without_column() {
        assert!(
            expand(parse_quote! {
                struct User {
                    #[fluent(unsettable)]
                    id: i64,
                }
            })
            .is_err()
        );
    }

    #[test]
    fn rejects_enums_and_generics() {
        assert!(expand(parse_quote! { enum E { A } }).is_err());
        assert!(
            expand(parse_quote! {
                struct W<T> {
                    #[fluent(column = "v")]
                    v: T,
                }
            })
            .is_err()
        );
    }
}
