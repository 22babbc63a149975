// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive macros generating per-type JSON codec hooks.
//!
//! `#[derive(Dto)]` maps a struct's declared fields to wire descriptors and
//! emits the `jwire::api::Dto` impl: a static `TypeDescriptor` plus the
//! field encode/decode bodies. `#[derive(WireEnum)]` maps a fieldless enum
//! to its underlying `i32` wire values.
//!
//! Supported field types:
//! - Primitives: `i32`, `i64`, `u32`, `f32`, `f64`, `bool`, `String`
//! - `DateTime<Utc>` (RFC 3339 wire strings)
//! - `Vec<T>` and `HashMap<String, T>` of any supported type
//! - `Option<T>` for nullable leaves
//! - `Option<U>` where `U` is itself a `#[derive(Dto)]` type (nested DTOs
//!   are always nullable, so the member must be `Option`)
//! - enums marked `#[dto(enumeration)]` deriving `WireEnum`
//!
//! Field attributes:
//! - `#[dto(rename = "wireName")]` - wire property name override (keyword
//!   collisions such as a member `namespace_` emitting `"namespace"`)
//! - `#[dto(enumeration)]` - the field's leaf type crosses the wire as a
//!   `WireEnum` `i32` instead of a nested object

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

/// Wire shape of one field, resolved from its Rust type.
enum FieldKind {
    String,
    I32,
    I64,
    U32,
    F32,
    F64,
    Bool,
    DateTime,
    /// Enum leaf; the type implements `WireEnum`.
    Enum(Box<Type>),
    /// Nested DTO; the member is `Option<U>` and this holds `U`.
    Object(Box<Type>),
    Array(Box<FieldKind>),
    Map(Box<FieldKind>),
    Nullable(Box<FieldKind>),
}

/// `#[derive(Dto)]` macro: generates `TypeDescriptor` + encode/decode impl
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let type_name = name.to_string();
    let type_id = compute_fnv1a_hash(&type_name);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return syn::Error::new_spanned(&input, "Only named fields are supported")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Only structs are supported; derive WireEnum for enums")
                .to_compile_error()
                .into()
        }
    };

    struct FieldInfo {
        member: syn::Ident,
        ty: syn::Type,
        wire_name: String,
        kind: FieldKind,
    }

    let mut field_infos = Vec::new();
    for field in fields {
        let Some(member) = field.ident.as_ref() else {
            return syn::Error::new_spanned(field, "Field must have a name")
                .to_compile_error()
                .into();
        };

        let (rename, enumeration) = match parse_dto_attrs(field) {
            Ok(parsed) => parsed,
            Err(err) => return err.to_compile_error().into(),
        };
        let wire_name = rename.unwrap_or_else(|| member.to_string());

        let kind = match classify(&field.ty, enumeration, true) {
            Ok(kind) => kind,
            Err(reason) => {
                return syn::Error::new_spanned(&field.ty, reason)
                    .to_compile_error()
                    .into()
            }
        };

        field_infos.push(FieldInfo {
            member: member.clone(),
            ty: field.ty.clone(),
            wire_name,
            kind,
        });
    }

    // Generate FieldDescriptor entries (declaration order = wire order)
    let descriptors: Vec<_> = field_infos
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let Ok(wire_index) = u32::try_from(idx) else {
                return syn::Error::new_spanned(
                    &f.member,
                    format!("Struct has too many fields (index {idx} exceeds u32::MAX)"),
                )
                .to_compile_error();
            };
            let wire_name = &f.wire_name;
            let member_name = f.member.to_string();
            let kind_tokens = kind_tokens(&f.kind);
            let nested_tokens = match nested_object_type(&f.kind) {
                Some(object_ty) => quote! {
                    Some(<#object_ty as ::jwire::api::Dto>::type_descriptor
                        as fn() -> &'static ::jwire::core::types::TypeDescriptor)
                },
                None => quote! { None },
            };
            quote! {
                ::jwire::core::types::FieldDescriptor {
                    wire_name: #wire_name,
                    member_name: #member_name,
                    wire_index: #wire_index,
                    kind: #kind_tokens,
                    nested: #nested_tokens,
                }
            }
        })
        .collect();

    // Generate encode statements: pre-baked key bytes, then the value
    let encode_fields: Vec<_> = field_infos
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let member = &f.member;
            let value = encode_value(&f.kind, &quote! { (&self.#member) });
            quote! {
                w.write_raw(keys.key(#idx))?;
                #value
            }
        })
        .collect();

    // Generate decode: per-field presence slots + the property loop
    let slots: Vec<_> = field_infos
        .iter()
        .map(|f| {
            let slot = format_ident!("field_{}", f.member);
            let slot_ty = slot_type(&f.kind, &f.ty);
            quote! { let mut #slot: #slot_ty = None; }
        })
        .collect();

    let arms: Vec<_> = field_infos
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let idx = idx as u32;
            let slot = format_ident!("field_{}", f.member);
            let assign = decode_assignment(&f.kind, &slot);
            quote! { Some(#idx) => { #assign } }
        })
        .collect();

    let constructors: Vec<_> = field_infos
        .iter()
        .map(|f| {
            let member = &f.member;
            let slot = format_ident!("field_{}", f.member);
            let expr = construct_member(&f.kind, &slot);
            quote! { #member: #expr }
        })
        .collect();

    // Field-less DTOs would otherwise warn on the unused encode params.
    let (writer_param, keys_param) = if field_infos.is_empty() {
        (format_ident!("_w"), format_ident!("_keys"))
    } else {
        (format_ident!("w"), format_ident!("keys"))
    };

    let expanded = quote! {
        impl ::jwire::api::Dto for #name {
            fn type_descriptor() -> &'static ::jwire::core::types::TypeDescriptor {
                static DESCRIPTOR: ::jwire::core::types::TypeDescriptor =
                    ::jwire::core::types::TypeDescriptor {
                        type_id: #type_id,
                        type_name: #type_name,
                        fields: &[#(#descriptors),*],
                    };
                &DESCRIPTOR
            }

            fn encode_fields(
                &self,
                #writer_param: &mut ::jwire::core::ser::JsonWriter,
                #keys_param: &::jwire::codec::KeyTable,
            ) -> ::jwire::api::Result<()> {
                #(#encode_fields)*
                Ok(())
            }

            fn decode_json(
                reader: &mut ::jwire::core::ser::JsonReader<'_>,
                names: &::jwire::codec::PropertyNameTable,
            ) -> ::jwire::api::Result<Self> {
                reader.expect(b'{')?;
                #(#slots)*
                if !reader.try_consume(b'}') {
                    loop {
                        let name = reader.read_property_name()?;
                        reader.expect(b':')?;
                        match names.lookup(name.as_ref()) {
                            #(#arms)*
                            _ => reader.skip_value()?,
                        }
                        if reader.try_consume(b',') {
                            continue;
                        }
                        reader.expect(b'}')?;
                        break;
                    }
                }
                Ok(Self {
                    #(#constructors),*
                })
            }
        }
    };

    TokenStream::from(expanded)
}

/// `#[derive(WireEnum)]` macro: fieldless enum <-> underlying `i32`
///
/// Discriminants follow Rust semantics: explicit `= N` values are honored,
/// unspecified variants continue from the previous value.
#[proc_macro_derive(WireEnum)]
pub fn derive_wire_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let type_name = name.to_string();

    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input, "WireEnum can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut next_value: i32 = 0;
    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(variant, "WireEnum variants must be fieldless")
                .to_compile_error()
                .into();
        }
        let value = match &variant.discriminant {
            Some((_, expr)) => match parse_discriminant(expr) {
                Ok(value) => value,
                Err(reason) => {
                    return syn::Error::new_spanned(expr, reason)
                        .to_compile_error()
                        .into()
                }
            },
            None => next_value,
        };
        next_value = value.wrapping_add(1);

        let ident = &variant.ident;
        let lit = proc_macro2::Literal::i32_unsuffixed(value);
        arms.push(quote! { #lit => Ok(#name::#ident), });
    }

    let expanded = quote! {
        impl ::jwire::api::WireEnum for #name {
            fn to_wire(self) -> i32 {
                self as i32
            }

            fn from_wire(raw: i32) -> ::jwire::core::ser::SerResult<Self> {
                match raw {
                    #(#arms)*
                    other => Err(::jwire::core::ser::SerError::UnknownEnumValue {
                        value: other,
                        type_name: #type_name,
                    }),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Parse `#[dto(...)]` field attributes: `(rename, enumeration)`.
fn parse_dto_attrs(field: &syn::Field) -> syn::Result<(Option<String>, bool)> {
    let mut rename = None;
    let mut enumeration = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("enumeration") {
                enumeration = true;
                Ok(())
            } else {
                Err(meta.error("unsupported dto attribute; expected `rename` or `enumeration`"))
            }
        })?;
    }
    Ok((rename, enumeration))
}

/// Resolve a Rust field type to its wire kind.
///
/// `top_level` distinguishes a struct member from a container element: a
/// bare nested DTO is only legal inside `Vec`/`HashMap` (members must be
/// `Option<U>` because nested objects are nullable on the wire).
fn classify(ty: &Type, enumeration: bool, top_level: bool) -> Result<FieldKind, String> {
    let Type::Path(type_path) = ty else {
        return Err("Unsupported field type; expected a named type".into());
    };
    let Some(segment) = type_path.path.segments.last() else {
        return Err("Unsupported field type; expected a named type".into());
    };

    match segment.ident.to_string().as_str() {
        "i32" => Ok(FieldKind::I32),
        "i64" => Ok(FieldKind::I64),
        "u32" => Ok(FieldKind::U32),
        "f32" => Ok(FieldKind::F32),
        "f64" => Ok(FieldKind::F64),
        "bool" => Ok(FieldKind::Bool),
        "String" => Ok(FieldKind::String),
        "DateTime" => Ok(FieldKind::DateTime),
        "Option" => {
            let inner = single_generic_arg(segment)
                .ok_or_else(|| "Option must have one type parameter".to_string())?;
            let inner_kind = classify(inner, enumeration, false)?;
            match inner_kind {
                // Nested DTOs are nullable by construction: Option<U> is the
                // Object kind itself, not Nullable(Object).
                FieldKind::Object(object_ty) => Ok(FieldKind::Object(object_ty)),
                FieldKind::Nullable(_) => {
                    Err("Nested Option<Option<T>> is not supported".into())
                }
                other => Ok(FieldKind::Nullable(Box::new(other))),
            }
        }
        "Vec" => {
            let elem = single_generic_arg(segment)
                .ok_or_else(|| "Vec must have one type parameter".to_string())?;
            let elem_kind = classify(elem, enumeration, false)?;
            if matches!(elem_kind, FieldKind::Nullable(_)) {
                return Err("Vec<Option<T>> is not supported".into());
            }
            Ok(FieldKind::Array(Box::new(elem_kind)))
        }
        "HashMap" => {
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return Err("HashMap must have two type parameters".into());
            };
            let mut types = args.args.iter().filter_map(|arg| match arg {
                GenericArgument::Type(t) => Some(t),
                _ => None,
            });
            let (Some(key), Some(value)) = (types.next(), types.next()) else {
                return Err("HashMap must have two type parameters".into());
            };
            if !is_string_type(key) {
                return Err("HashMap keys must be String (JSON object keys)".into());
            }
            let value_kind = classify(value, enumeration, false)?;
            if matches!(value_kind, FieldKind::Nullable(_)) {
                return Err("HashMap<_, Option<T>> is not supported".into());
            }
            Ok(FieldKind::Map(Box::new(value_kind)))
        }
        _ if enumeration => Ok(FieldKind::Enum(Box::new(ty.clone()))),
        _ if top_level => Err(
            "Nested DTO fields must be declared Option<T> (nested objects are nullable on the wire)"
                .into(),
        ),
        _ => Ok(FieldKind::Object(Box::new(ty.clone()))),
    }
}

fn single_generic_arg(segment: &syn::PathSegment) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(inner)) = args.args.first() {
            return Some(inner);
        }
    }
    None
}

fn is_string_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "String";
        }
    }
    false
}

/// `ValueKind` construction tokens for the descriptor. Nested kinds promote
/// to `&'static` via constant promotion.
fn kind_tokens(kind: &FieldKind) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::String => quote! { ::jwire::core::types::ValueKind::String },
        FieldKind::I32 => quote! { ::jwire::core::types::ValueKind::I32 },
        FieldKind::I64 => quote! { ::jwire::core::types::ValueKind::I64 },
        FieldKind::U32 => quote! { ::jwire::core::types::ValueKind::U32 },
        FieldKind::F32 => quote! { ::jwire::core::types::ValueKind::F32 },
        FieldKind::F64 => quote! { ::jwire::core::types::ValueKind::F64 },
        FieldKind::Bool => quote! { ::jwire::core::types::ValueKind::Bool },
        FieldKind::DateTime => quote! { ::jwire::core::types::ValueKind::DateTime },
        FieldKind::Enum(_) => quote! { ::jwire::core::types::ValueKind::Enum },
        FieldKind::Object(_) => quote! { ::jwire::core::types::ValueKind::Object },
        FieldKind::Array(elem) => {
            let elem = kind_tokens(elem);
            quote! { ::jwire::core::types::ValueKind::Array(&#elem) }
        }
        FieldKind::Map(value) => {
            let value = kind_tokens(value);
            quote! { ::jwire::core::types::ValueKind::Map(&#value) }
        }
        FieldKind::Nullable(inner) => {
            let inner = kind_tokens(inner);
            quote! { ::jwire::core::types::ValueKind::Nullable(&#inner) }
        }
    }
}

/// First nested DTO type reachable from this kind, for the descriptor's
/// `nested` accessor.
fn nested_object_type(kind: &FieldKind) -> Option<&Type> {
    match kind {
        FieldKind::Object(ty) => Some(ty),
        FieldKind::Array(inner) | FieldKind::Map(inner) | FieldKind::Nullable(inner) => {
            nested_object_type(inner)
        }
        _ => None,
    }
}

/// Encode statements for one value expression of type `&T`.
fn encode_value(kind: &FieldKind, value: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::String => quote! { w.write_string(#value)?; },
        FieldKind::I32 => quote! { w.write_i32(*#value)?; },
        FieldKind::I64 => quote! { w.write_i64(*#value)?; },
        FieldKind::U32 => quote! { w.write_u32(*#value)?; },
        FieldKind::F32 => quote! { w.write_f32(*#value)?; },
        FieldKind::F64 => quote! { w.write_f64(*#value)?; },
        FieldKind::Bool => quote! { w.write_bool(*#value)?; },
        FieldKind::DateTime => quote! { ::jwire::codec::datetime::encode(#value, w)?; },
        FieldKind::Enum(_) => {
            quote! { w.write_i32(::jwire::api::WireEnum::to_wire(*#value))?; }
        }
        FieldKind::Object(object_ty) => quote! {
            match #value.as_ref() {
                Some(nested) => ::jwire::codec::registry::global()
                    .get::<#object_ty>()
                    .serialize_into(nested, w)?,
                None => w.write_null()?,
            }
        },
        FieldKind::Array(elem) => {
            let elem_encode = encode_element(elem, &quote! { item });
            quote! {
                w.write_raw(b"[")?;
                for (i, item) in #value.iter().enumerate() {
                    if i > 0 {
                        w.write_raw(b",")?;
                    }
                    #elem_encode
                }
                w.write_raw(b"]")?;
            }
        }
        FieldKind::Map(value_kind) => {
            let value_encode = encode_element(value_kind, &quote! { entry_value });
            quote! {
                w.write_raw(b"{")?;
                for (i, (entry_key, entry_value)) in #value.iter().enumerate() {
                    if i > 0 {
                        w.write_raw(b",")?;
                    }
                    w.write_string(entry_key)?;
                    w.write_raw(b":")?;
                    #value_encode
                }
                w.write_raw(b"}")?;
            }
        }
        FieldKind::Nullable(inner) => {
            let inner_encode = encode_value(inner, &quote! { present });
            quote! {
                match #value.as_ref() {
                    Some(present) => { #inner_encode }
                    None => w.write_null()?,
                }
            }
        }
    }
}

/// Encode statements for one container element of type `&T`. Differs from
/// the member case only for nested DTOs: elements are not nullable, so the
/// element type is `U` itself rather than `Option<U>`.
fn encode_element(kind: &FieldKind, value: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::Object(object_ty) => quote! {
            ::jwire::codec::registry::global()
                .get::<#object_ty>()
                .serialize_into(#value, w)?;
        },
        other => encode_value(other, value),
    }
}

/// Decode expression producing one value of the member's type.
fn decode_expr(kind: &FieldKind) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::String => quote! { reader.read_string()? },
        FieldKind::I32 => quote! { reader.read_i32()? },
        FieldKind::I64 => quote! { reader.read_i64()? },
        FieldKind::U32 => quote! { reader.read_u32()? },
        FieldKind::F32 => quote! { reader.read_f32()? },
        FieldKind::F64 => quote! { reader.read_f64()? },
        FieldKind::Bool => quote! { reader.read_bool()? },
        FieldKind::DateTime => quote! { ::jwire::codec::datetime::decode(reader)? },
        FieldKind::Enum(enum_ty) => quote! {
            <#enum_ty as ::jwire::api::WireEnum>::from_wire(reader.read_i32()?)?
        },
        FieldKind::Object(object_ty) => quote! {
            ::jwire::codec::registry::global()
                .get::<#object_ty>()
                .decode_value(reader)?
        },
        FieldKind::Array(elem) => {
            let elem_decode = decode_element(elem);
            quote! {{
                let mut items = Vec::new();
                reader.expect(b'[')?;
                if !reader.try_consume(b']') {
                    loop {
                        items.push(#elem_decode);
                        if reader.try_consume(b',') {
                            continue;
                        }
                        reader.expect(b']')?;
                        break;
                    }
                }
                items
            }}
        }
        FieldKind::Map(value_kind) => {
            let value_decode = decode_element(value_kind);
            quote! {{
                let mut entries = ::std::collections::HashMap::new();
                reader.expect(b'{')?;
                if !reader.try_consume(b'}') {
                    loop {
                        let entry_key = reader.read_string()?;
                        reader.expect(b':')?;
                        entries.insert(entry_key, #value_decode);
                        if reader.try_consume(b',') {
                            continue;
                        }
                        reader.expect(b'}')?;
                        break;
                    }
                }
                entries
            }}
        }
        FieldKind::Nullable(inner) => {
            let inner_decode = decode_expr(inner);
            quote! {
                if reader.try_consume_null() {
                    None
                } else {
                    Some(#inner_decode)
                }
            }
        }
    }
}

/// Decode expression for one container element (see `encode_element`).
fn decode_element(kind: &FieldKind) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::Object(object_ty) => quote! {
            ::jwire::codec::registry::global()
                .get::<#object_ty>()
                .decode_required(reader)?
        },
        other => decode_expr(other),
    }
}

/// Presence-slot type for one field: `Option<member type>`, except Object
/// members which are already `Option<U>`.
fn slot_type(kind: &FieldKind, field_ty: &Type) -> proc_macro2::TokenStream {
    match kind {
        // Object/Nullable members are Option<..> themselves; the slot is the
        // member, with "absent" and "present null" both mapping to None.
        FieldKind::Object(_) | FieldKind::Nullable(_) => quote! { #field_ty },
        _ => quote! { Option<#field_ty> },
    }
}

/// Assignment into the presence slot when the field shows up on the wire.
fn decode_assignment(kind: &FieldKind, slot: &syn::Ident) -> proc_macro2::TokenStream {
    let expr = decode_expr(kind);
    match kind {
        FieldKind::Object(_) | FieldKind::Nullable(_) => quote! { #slot = #expr; },
        _ => quote! { #slot = Some(#expr); },
    }
}

/// Member construction: absent fields fall back to the type's default
/// (epoch for timestamps, which have no `Default`).
fn construct_member(kind: &FieldKind, slot: &syn::Ident) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::Object(_) | FieldKind::Nullable(_) => quote! { #slot },
        FieldKind::DateTime => quote! { #slot.unwrap_or_else(::jwire::codec::datetime::epoch) },
        _ => quote! { #slot.unwrap_or_default() },
    }
}

/// Parse an explicit enum discriminant (`= 3`, `= -1`).
fn parse_discriminant(expr: &syn::Expr) -> Result<i32, String> {
    match expr {
        syn::Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Int(int) => int
                .base10_parse::<i32>()
                .map_err(|_| "discriminant out of i32 range".into()),
            _ => Err("discriminant must be an integer literal".into()),
        },
        syn::Expr::Unary(unary) if matches!(unary.op, syn::UnOp::Neg(_)) => {
            parse_discriminant(&unary.expr).map(i32::wrapping_neg)
        }
        _ => Err("discriminant must be an integer literal".into()),
    }
}

/// Compute FNV-1a hash (32-bit) for type ID
fn compute_fnv1a_hash(s: &str) -> u32 {
    let mut hash = 2_166_136_261_u32;
    for byte in s.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}
