//! Implementation of the `#[derive(Entity)]` macro.
//!
//! This macro generates one `Field` constant per field and an implementation
//! of the `Entity` trait returning each field's runtime value.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_field_attrs;

/// Main implementation of the Entity derive macro.
pub fn entity_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Entity can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Entity can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let query_name = attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());
        if seen.contains(&query_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate field name '{}'", query_name),
            ));
        }
        seen.push(query_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        let field_ty = &field.ty;
        let doc = format!("Field token for `{}`.", query_name);

        field_constants.push(quote! {
            #[doc = #doc]
            pub const #const_name: ::specdsl::Field<Self, #field_ty> =
                ::specdsl::Field::new(#query_name);
        });

        let value_expr = if attrs.relation {
            quote_spanned! {field_ty.span()=>
                ::specdsl::Relation::related_value(&self.#field_name)
            }
        } else {
            quote_spanned! {field_ty.span()=>
                ::specdsl::ToValue::to_value(&self.#field_name)
            }
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::specdsl::Entity for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::specdsl::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::specdsl::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphabetic();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(tokens: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(tokens)?;
        entity_derive_impl(input).map(|ts| ts.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("birth_year"), "BIRTH_YEAR");
        assert_eq!(to_screaming_snake_case("birthYear"), "BIRTH_YEAR");
        assert_eq!(to_screaming_snake_case("first-name"), "FIRST_NAME");
        assert_eq!(to_screaming_snake_case("line2Total"), "LINE2TOTAL");
    }

    #[test]
    fn test_generates_constants_and_accessor() {
        let out = expand(
            "struct Actor { first_name: String, #[field(rename = \"born\")] birth_year: Option<u16> }",
        )
        .unwrap();
        assert!(out.contains("pub const FIRST_NAME"));
        assert!(out.contains("pub const BORN"));
        assert!(out.contains("\"born\" =>"));
        assert!(out.contains(":: specdsl :: ToValue :: to_value"));
    }

    #[test]
    fn test_relation_uses_related_value() {
        let out = expand("struct Actor { #[field(relation)] address: Option<Address> }").unwrap();
        assert!(out.contains(":: specdsl :: Relation :: related_value"));
    }

    #[test]
    fn test_skip_omits_field() {
        let out = expand("struct Actor { id: u64, #[field(skip)] cache: Vec<u8> }").unwrap();
        assert!(out.contains("pub const ID"));
        assert!(!out.contains("CACHE"));
    }

    #[test]
    fn test_rejects_non_structs() {
        let err = expand("enum Actor { A, B }").unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));

        let err = expand("struct Actor(String);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = expand("struct Actor { a: u8, #[field(rename = \"a\")] b: u8 }").unwrap_err();
        assert!(err.to_string().contains("duplicate field name"));
    }
}
