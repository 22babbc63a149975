// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptor for runtime field layout and codec metadata.
//!
//! Defines `TypeDescriptor` and `FieldDescriptor` for describing DTO types
//! at runtime. Emitted by `#[derive(Dto)]`; consumed by codec construction
//! (pre-baked key bytes, property-name table) and diagnostics.

/// Wire shape of a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    I32,
    I64,
    U32,
    F32,
    F64,
    Bool,
    /// RFC 3339 timestamp string (see `codec::datetime`).
    DateTime,
    /// Enum encoded as its underlying `i32` wire value.
    Enum,
    /// Nested DTO; the member is `Option<T>` and `null` round-trips to `None`.
    Object,
    /// JSON array of the element kind.
    Array(&'static ValueKind),
    /// JSON object with string keys and values of the given kind.
    Map(&'static ValueKind),
    /// Optional leaf value; `null` round-trips to `None`.
    Nullable(&'static ValueKind),
}

/// Layout of a single field (generated, declaration order).
#[derive(Debug)]
pub struct FieldDescriptor {
    /// Property name as it appears on the wire (case-sensitive contract).
    pub wire_name: &'static str,
    /// In-memory member identifier. Differs from `wire_name` when the wire
    /// name collides with a language keyword (e.g. member `namespace_`,
    /// wire name `"namespace"`).
    pub member_name: &'static str,
    /// Dense index `0..N-1` in declaration order; array position for
    /// dispatch, never a hash.
    pub wire_index: u32,
    pub kind: ValueKind,
    /// Descriptor accessor for the nested DTO type, when `kind` contains
    /// `Object` at any depth.
    pub nested: Option<fn() -> &'static TypeDescriptor>,
}

/// Type descriptor: metadata for codec construction and registry diagnostics.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// FNV-1a hash of `type_name`.
    pub type_id: u32,
    pub type_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl TypeDescriptor {
    pub const fn new(
        type_id: u32,
        type_name: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            type_id,
            type_name,
            fields,
        }
    }

    /// Look up a field by its wire name (diagnostics; codecs use the
    /// property-name table instead).
    #[must_use]
    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }
}

/// FNV-1a hash (32-bit) for type IDs.
///
/// Must stay in sync with the hash the derive macro commits into generated
/// descriptors.
#[must_use]
pub fn fnv1a_32(s: &str) -> u32 {
    let mut hash = 2_166_136_261_u32;
    for byte in s.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vectors() {
        // Standard FNV-1a reference values.
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_field_lookup_by_wire_name() {
        static FIELDS: [FieldDescriptor; 2] = [
            FieldDescriptor {
                wire_name: "namespace",
                member_name: "namespace_",
                wire_index: 0,
                kind: ValueKind::String,
                nested: None,
            },
            FieldDescriptor {
                wire_name: "balance",
                member_name: "balance",
                wire_index: 1,
                kind: ValueKind::I32,
                nested: None,
            },
        ];
        let desc = TypeDescriptor::new(fnv1a_32("Wallet"), "Wallet", &FIELDS);

        let field = desc
            .field_by_wire_name("namespace")
            .expect("field should resolve");
        assert_eq!(field.member_name, "namespace_");
        assert_eq!(field.wire_index, 0);
        assert!(desc.field_by_wire_name("Namespace").is_none());
    }
}
