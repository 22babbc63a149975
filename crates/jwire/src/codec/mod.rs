// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type codec objects.
//!
//! A `Codec<T>` pairs the serialize and deserialize pipelines for one DTO
//! type. It is built once per type (see `registry`), owns the immutable
//! pre-computed wire fragments, and is shared read-only across threads:
//!
//! - `KeyTable`: one pre-encoded `"name":` byte sequence per field, with
//!   the leading `,` baked into every key after the first. The encoder
//!   never re-escapes a property name and never branches on "first field".
//! - `PropertyNameTable`: byte trie resolving incoming property names to
//!   wire indices without allocating.
//!
//! Field-level encode/decode bodies are generated by `#[derive(Dto)]`; the
//! codec owns the null guards, the root object framing, and the
//! end-of-document check.

pub mod datetime;
pub mod matcher;
pub mod registry;

pub use matcher::PropertyNameTable;

use crate::api::{Dto, Result};
use crate::core::ser::writer::push_json_string;
use crate::core::ser::{JsonReader, JsonWriter};
use crate::core::types::{FieldDescriptor, TypeDescriptor};
use std::any::Any;
use std::marker::PhantomData;

/// Pre-encoded `"name":` fragments, one per field in declaration order.
#[derive(Debug)]
pub struct KeyTable {
    keys: Box<[Box<[u8]>]>,
}

impl KeyTable {
    #[must_use]
    pub fn build(fields: &[FieldDescriptor]) -> Self {
        let keys = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let mut key = Vec::with_capacity(field.wire_name.len() + 4);
                if i > 0 {
                    key.push(b',');
                }
                push_json_string(&mut key, field.wire_name);
                key.push(b':');
                key.into_boxed_slice()
            })
            .collect();
        Self { keys }
    }

    /// Key bytes for the field at `wire_index`; empty for an out-of-range
    /// index (generated callers always pass indices from the descriptor).
    #[must_use]
    pub fn key(&self, wire_index: usize) -> &[u8] {
        match self.keys.get(wire_index) {
            Some(key) => key,
            None => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Serialize/deserialize pair for one DTO type.
pub struct Codec<T: Dto> {
    descriptor: &'static TypeDescriptor,
    keys: KeyTable,
    names: PropertyNameTable,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Dto> Codec<T> {
    /// Construct from the type's generated descriptor. Called once per type
    /// by the registry; everything computed here is immutable afterwards.
    pub(crate) fn build() -> Self {
        let descriptor = T::type_descriptor();
        Self {
            descriptor,
            keys: KeyTable::build(descriptor.fields),
            names: PropertyNameTable::build(descriptor.fields),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    /// Serialize to a UTF-8 JSON byte vector. `None` becomes the `null`
    /// literal, mirroring the decode side.
    pub fn serialize(&self, value: Option<&T>) -> Result<Vec<u8>> {
        let mut w = JsonWriter::with_capacity(64 * self.keys.len().max(1));
        match value {
            None => w.write_null()?,
            Some(v) => self.serialize_into(v, &mut w)?,
        }
        Ok(w.into_bytes())
    }

    /// Write one (non-null) object value; entry point for nested fields.
    pub fn serialize_into(&self, value: &T, w: &mut JsonWriter) -> Result<()> {
        w.write_raw(b"{")?;
        value.encode_fields(w, &self.keys)?;
        w.write_raw(b"}")?;
        Ok(())
    }

    /// Deserialize a complete JSON document. The JSON `null` literal yields
    /// `None`; trailing non-whitespace is an error.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Option<T>> {
        let mut r = JsonReader::new(bytes);
        let value = self.decode_value(&mut r)?;
        r.expect_end()?;
        Ok(value)
    }

    /// Decode one value at the reader's position; entry point for nested
    /// fields. A malformed value aborts the whole decode — no partial
    /// object is ever produced.
    pub fn decode_value(&self, r: &mut JsonReader<'_>) -> Result<Option<T>> {
        if r.try_consume_null() {
            return Ok(None);
        }
        T::decode_json(r, &self.names).map(Some)
    }

    /// Decode one value where `null` is not an accepted shape (array
    /// elements and map values; members use `decode_value`).
    pub fn decode_required(&self, r: &mut JsonReader<'_>) -> Result<T> {
        match self.decode_value(r)? {
            Some(value) => Ok(value),
            None => Err(crate::core::ser::SerError::TypeMismatch {
                offset: r.offset(),
                expected: "object",
            }
            .into()),
        }
    }
}

/// Type-erased view of a codec for dynamic callers (admin tooling, generic
/// marshalling). The typed path stays static-dispatch.
pub trait ErasedCodec: Send + Sync {
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Serialize a value behind `&dyn Any`. The value must be the codec's
    /// own DTO type.
    fn serialize_any(&self, value: Option<&dyn Any>) -> Result<Vec<u8>>;
}

impl std::fmt::Debug for dyn ErasedCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedCodec")
            .field("type_name", &self.descriptor().type_name)
            .finish()
    }
}

impl<T: Dto> ErasedCodec for Codec<T> {
    fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    fn serialize_any(&self, value: Option<&dyn Any>) -> Result<Vec<u8>> {
        match value {
            None => self.serialize(None),
            Some(any) => match any.downcast_ref::<T>() {
                Some(v) => self.serialize(Some(v)),
                None => Err(crate::api::Error::ValueTypeMismatch(
                    self.descriptor.type_name,
                )),
            },
        }
    }
}
