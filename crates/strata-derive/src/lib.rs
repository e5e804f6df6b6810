//! Derive macros for record templates.
//!
//! This crate provides the `#[derive(Record)]` macro, which describes a
//! struct as an entity template and converts it to and from field values.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, Lit,
    Meta, PathArguments, Type,
};

/// Derives `strata_orm::Record` for a struct with named fields.
///
/// # Attributes
///
/// - `#[record(name = "Entity")]` - Entity name used in statements (optional,
///   defaults to the struct name)
/// - `#[record(table = "table_name")]` - Physical table name (optional,
///   defaults to the entity name)
///
/// # Field Attributes
///
/// - `#[field(key)]` - Marks the field as (part of) the primary key
/// - `#[field(name = "logicalName")]` - Logical field name (optional,
///   defaults to the Rust field name)
/// - `#[field(column = "column_name")]` - Explicit base column name
/// - `#[field(ty = "TypeName")]` - Maps the field as the named logical type
///   registered by the caller instead of the type's own logical type
///
/// Field types must implement `ToValue` and `FromValue`; without `ty` they
/// must also implement `Typed`. `Option<T>` fields are nullable.
#[proc_macro_derive(Record, attributes(record, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_record_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let record_attrs = parse_record_attrs(&input.attrs)?;
    let entity_name = record_attrs
        .name
        .unwrap_or_else(|| struct_name.to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record derive only supports structs",
            ));
        }
    };

    let mut field_infos: Vec<FieldInfo> = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        field_infos.push(FieldInfo {
            logical_name: attrs.name.unwrap_or_else(|| ident.to_string()),
            ident,
            field_type: field.ty.clone(),
            key: attrs.key,
            column: attrs.column,
            named_type: attrs.ty,
        });
    }

    let core = quote!(::strata_orm::strata_core);

    let field_defs: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let logical_name = &info.logical_name;
            let field_type = &info.field_type;
            let (logical_type, nullable) = match &info.named_type {
                Some(ty) => {
                    let nullable = is_option(field_type);
                    (
                        quote!(#core::mapping::LogicalType::Named(#ty.to_string())),
                        quote!(#nullable),
                    )
                }
                None => (
                    quote!(<#field_type as #core::mapping::Typed>::logical_type()),
                    quote!(<#field_type as #core::mapping::Typed>::nullable()),
                ),
            };
            let mut def = quote! {
                let mut field = #core::ast::FieldDef::new(#logical_name, #logical_type);
                if !#nullable {
                    field = field.not_null();
                }
            };
            if info.key {
                def.extend(quote!(field = field.key();));
            }
            if let Some(column) = &info.column {
                def.extend(quote!(field = field.column(#column);));
            }
            quote! {
                entity = entity.field({
                    #def
                    field
                });
            }
        })
        .collect();

    let table = match &record_attrs.table {
        Some(table) => quote!(entity = entity.table(#table);),
        None => quote!(),
    };

    let field_idents: Vec<&Ident> = field_infos.iter().map(|info| &info.ident).collect();
    let field_names: Vec<&str> = field_infos
        .iter()
        .map(|info| info.logical_name.as_str())
        .collect();
    let field_count = field_infos.len();

    let expanded = quote! {
        impl ::strata_orm::Record for #struct_name {
            fn entity() -> #core::ast::EntityDef {
                #[allow(unused_mut)]
                let mut entity = #core::ast::EntityDef::new(#entity_name);
                #table
                #(#field_defs)*
                entity
            }

            fn to_values(&self) -> ::std::vec::Vec<#core::mapping::Value> {
                ::std::vec![
                    #(#core::mapping::ToValue::to_value(&self.#field_idents)),*
                ]
            }

            fn from_values(
                values: ::std::vec::Vec<#core::mapping::Value>,
            ) -> ::strata_orm::Result<Self> {
                if values.len() != #field_count {
                    return ::std::result::Result::Err(::strata_orm::OrmError::invalid_record(
                        #entity_name,
                        ::std::format!("expected {} values, found {}", #field_count, values.len()),
                    ));
                }
                let mut values = values.into_iter();
                ::std::result::Result::Ok(Self {
                    #(
                        #field_idents: values
                            .next()
                            .ok_or_else(|| ::strata_orm::OrmError::invalid_record(
                                #entity_name,
                                ::std::concat!("missing value for field '", #field_names, "'"),
                            ))
                            .and_then(|value| {
                                #core::mapping::FromValue::from_value(value)
                                    .map_err(::strata_orm::OrmError::from)
                            })?,
                    )*
                })
            }
        }
    };

    Ok(expanded)
}

struct FieldInfo {
    ident: Ident,
    field_type: Type,
    logical_name: String,
    key: bool,
    column: Option<String>,
    named_type: Option<String>,
}

#[derive(Default)]
struct RecordAttrs {
    name: Option<String>,
    table: Option<String>,
}

#[derive(Default)]
struct FieldAttrs {
    key: bool,
    name: Option<String>,
    column: Option<String>,
    ty: Option<String>,
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

fn parse_record_attrs(attrs: &[Attribute]) -> syn::Result<RecordAttrs> {
    let mut result = RecordAttrs::default();
    for attr in attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    result.name = Some(string_value(&meta)?);
                } else if meta.path.is_ident("table") {
                    result.table = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error("unknown record attribute"));
                }
                Ok(())
            })?;
        }
    }
    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("field") {
            // Handle empty attribute like #[field]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    result.key = true;
                } else if meta.path.is_ident("name") {
                    result.name = Some(string_value(&meta)?);
                } else if meta.path.is_ident("column") {
                    result.column = Some(string_value(&meta)?);
                } else if meta.path.is_ident("ty") {
                    result.ty = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error("unknown field attribute"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

/// Returns true for `Option<T>` written with a path ending in `Option`.
fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| {
        segment.ident == "Option"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if matches!(args.args.first(), Some(GenericArgument::Type(_)))
            )
    })
}
