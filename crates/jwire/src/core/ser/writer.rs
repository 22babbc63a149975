// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Append-only JSON writer over an owned byte buffer.
//!
//! Produces UTF-8 JSON text. Property-key fragments are expected to arrive
//! pre-encoded (see `codec::KeyTable`); the writer only formats values.

use super::{SerError, SerResult};

/// Generate writer methods for integer types (eliminates code duplication)
macro_rules! impl_write_int {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> SerResult<()> {
            self.write_display(value)
        }
    };
}

/// Generate writer methods for float types.
///
/// JSON has no literal for NaN or the infinities, so non-finite input is
/// rejected up front. Finite values print as the shortest decimal form that
/// round-trips at the declared width.
macro_rules! impl_write_float {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> SerResult<()> {
            if !value.is_finite() {
                return Err(SerError::InvalidData {
                    reason: "non-finite float has no JSON representation".into(),
                });
            }
            self.write_display(value)
        }
    };
}

/// Append `s` to `out` as a quoted, escaped JSON string literal.
///
/// Shared by value writing and `KeyTable` construction so property keys and
/// string values escape identically.
pub(crate) fn push_json_string(out: &mut Vec<u8>, s: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push(b'"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            b if b < 0x20 => {
                out.extend_from_slice(b"\\u00");
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0x0F) as usize]);
            }
            b => out.push(b),
        }
    }
    out.push(b'"');
}

/// JSON writer appending to an owned `Vec<u8>`.
pub struct JsonWriter {
    out: Vec<u8>,
}

impl JsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self { out: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Append pre-encoded wire bytes (pre-baked keys, structural tokens).
    pub fn write_raw(&mut self, bytes: &[u8]) -> SerResult<()> {
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_null(&mut self) -> SerResult<()> {
        self.write_raw(b"null")
    }

    pub fn write_bool(&mut self, value: bool) -> SerResult<()> {
        self.write_raw(if value { b"true" } else { b"false" })
    }

    pub fn write_string(&mut self, value: &str) -> SerResult<()> {
        push_json_string(&mut self.out, value);
        Ok(())
    }

    // Generate numeric writers via macro (DRY principle)
    impl_write_int!(write_i32, i32);
    impl_write_int!(write_i64, i64);
    impl_write_int!(write_u32, u32);
    impl_write_float!(write_f32, f32);
    impl_write_float!(write_f64, f64);

    fn write_display<T: std::fmt::Display>(&mut self, value: T) -> SerResult<()> {
        use std::io::Write;
        // Writing into a Vec cannot fail; the map_err keeps the no-panic contract.
        write!(self.out, "{}", value).map_err(|err| SerError::WriteFailed {
            offset: self.out.len(),
            reason: err.to_string(),
        })
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
