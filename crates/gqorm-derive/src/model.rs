//! Model derive macro implementation.

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let model_name = get_model_name(&input);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let mut accessors: Vec<TokenStream> = Vec::with_capacity(fields.len() * 2);
    let mut pk_constraint: Option<String> = None;

    for field in fields.iter() {
        let field_ident = field.ident.clone().expect("named field");
        let attr = parse_field_attr(field)?;
        if attr.skip {
            continue;
        }

        let gql_name = attr.name.unwrap_or_else(|| field_ident.to_string());
        let sel_ident = format_ident!("{}_field", field_ident);

        if attr.pk {
            let constraint = attr
                .constraint
                .unwrap_or_else(|| format!("{}_pkey", model_name));
            if pk_constraint.replace(constraint).is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Model allows at most one #[gq(pk)] field",
                ));
            }
        }

        if attr.relation {
            let related = related_type(&field.ty);
            let doc = format!("Nested selection into the `{gql_name}` relationship.");
            accessors.push(quote! {
                #[doc = #doc]
                pub fn #field_ident(
                    first: ::gqorm::FieldName<#related>,
                    rest: impl ::core::iter::IntoIterator<Item = ::gqorm::FieldName<#related>>,
                ) -> ::gqorm::FieldName<Self> {
                    ::gqorm::FieldName::relation(#gql_name, first, rest)
                }
            });
            continue;
        }

        let sel_doc = format!("Selection handle for `{gql_name}`.");
        accessors.push(quote! {
            #[doc = #sel_doc]
            pub fn #sel_ident() -> ::gqorm::FieldName<Self> {
                ::gqorm::FieldName::new(#gql_name)
            }
        });

        let bind_doc = format!("Bind a value to `{gql_name}` for writes and comparisons.");
        if attr.json {
            accessors.push(quote! {
                #[doc = #bind_doc]
                pub fn #field_ident(value: impl ::serde::Serialize) -> ::gqorm::Field<Self> {
                    ::gqorm::Field::new(#gql_name, ::gqorm::Value::json(value))
                }
            });
        } else {
            accessors.push(quote! {
                #[doc = #bind_doc]
                pub fn #field_ident(
                    value: impl ::core::convert::Into<::gqorm::Value>,
                ) -> ::gqorm::Field<Self> {
                    ::gqorm::Field::new(#gql_name, value)
                }
            });
        }
    }

    let primary_key_fn = pk_constraint.map(|constraint| {
        quote! {
            /// The primary-key constraint token, for `on_conflict`.
            pub fn primary_key() -> ::gqorm::Constraint<Self> {
                ::gqorm::Constraint::new(#constraint)
            }
        }
    });

    Ok(quote! {
        impl ::gqorm::Model for #name {
            fn model_name() -> &'static str {
                #model_name
            }
        }

        impl #name {
            #(#accessors)*

            #primary_key_fn
        }
    })
}

/// `#[gq(model = "name")]`, defaulting to the snake_cased struct name.
fn get_model_name(input: &DeriveInput) -> String {
    for attr in &input.attrs {
        if attr.path().is_ident("gq")
            && let Ok(nested) = attr.parse_args::<syn::MetaNameValue>()
            && nested.path.is_ident("model")
            && let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = &nested.value
        {
            return lit.value();
        }
    }
    input.ident.to_string().to_snake_case()
}

/// Parsed `#[gq(...)]` field attribute.
#[derive(Default)]
struct FieldAttr {
    pk: bool,
    json: bool,
    relation: bool,
    skip: bool,
    name: Option<String>,
    constraint: Option<String>,
}

fn parse_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut parsed = FieldAttr::default();
    for attr in &field.attrs {
        if attr.path().is_ident("gq") {
            let part: FieldAttr = attr.parse_args()?;
            parsed.pk |= part.pk;
            parsed.json |= part.json;
            parsed.relation |= part.relation;
            parsed.skip |= part.skip;
            parsed.name = part.name.or(parsed.name);
            parsed.constraint = part.constraint.or(parsed.constraint);
        }
    }
    Ok(parsed)
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut parsed = FieldAttr::default();

        // Comma-separated markers (`pk`, `json`, ...) or key = "value" pairs
        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                match ident.to_string().as_str() {
                    "name" => parsed.name = Some(value.value()),
                    "constraint" => parsed.constraint = Some(value.value()),
                    "model" => {}
                    other => {
                        return Err(syn::Error::new(
                            ident.span(),
                            format!("unknown gq attribute `{other}`"),
                        ));
                    }
                }
            } else {
                match ident.to_string().as_str() {
                    "pk" => parsed.pk = true,
                    "json" => parsed.json = true,
                    "relation" => parsed.relation = true,
                    "skip" => parsed.skip = true,
                    other => {
                        return Err(syn::Error::new(
                            ident.span(),
                            format!("unknown gq attribute `{other}`"),
                        ));
                    }
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(parsed)
    }
}

/// The related model type of a relationship field: the field type with
/// `Option`/`Vec`/`Box` wrappers stripped.
fn related_type(ty: &syn::Type) -> &syn::Type {
    if let syn::Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && matches!(segment.ident.to_string().as_str(), "Option" | "Vec" | "Box")
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        related_type(inner)
    } else {
        ty
    }
}
