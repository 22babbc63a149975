// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Public codec API
//!
//! The two contracts every generated DTO type participates in:
//!
//! - [`Dto`]: the per-type codec hooks emitted by `#[derive(Dto)]` — a
//!   static type descriptor plus field-level encode/decode bodies. The
//!   framing (null guards, `{`/`}`, unknown-field skipping machinery) lives
//!   in [`crate::codec::Codec`].
//! - [`WireEnum`]: enums crossing the wire as their underlying `i32`,
//!   emitted by `#[derive(WireEnum)]`.
//!
//! [`to_json`] / [`from_json`] are the convenience entry points backed by
//! the global [`crate::codec::registry`].

use crate::codec::{KeyTable, PropertyNameTable};
use crate::core::ser::{JsonReader, JsonWriter, SerError, SerResult};
use crate::core::types::TypeDescriptor;

/// Errors returned by jwire codec operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// No codec registered for the requested type. A configuration error:
    /// the type was never pre-registered nor built through the typed path.
    UnregisteredType(String),
    /// An erased serialize call received a value of a different type than
    /// the codec's DTO type (the name carried is the codec's type).
    ValueTypeMismatch(&'static str),

    // ========================================================================
    // Data Errors
    // ========================================================================
    /// JSON encode/decode failed (malformed input, wrong wire shape,
    /// non-encodable value).
    Serialization(SerError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnregisteredType(name) => {
                write!(f, "no codec registered for type: {}", name)
            }
            Error::ValueTypeMismatch(type_name) => {
                write!(f, "value is not an instance of {}", type_name)
            }
            Error::Serialization(err) => write!(f, "serialization failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SerError> for Error {
    fn from(err: SerError) -> Self {
        Error::Serialization(err)
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

/// DTO codec contract, implemented exclusively by `#[derive(Dto)]`.
///
/// The generated bodies follow the wire contract: fields encode in
/// declaration order through pre-baked key bytes; decode tracks presence
/// per field and leaves absent fields at their defaults; unknown incoming
/// properties are skipped, never an error.
pub trait Dto: Sized + Send + Sync + 'static {
    /// Generated type descriptor (field layout in declaration order).
    fn type_descriptor() -> &'static TypeDescriptor;

    /// Encode this value's fields (without the surrounding braces).
    ///
    /// # Errors
    ///
    /// Returns `Err` if a value cannot be represented in JSON (e.g. a
    /// non-finite float) or a nested encode fails.
    fn encode_fields(&self, w: &mut JsonWriter, keys: &KeyTable) -> Result<()>;

    /// Decode one object (including the surrounding braces).
    ///
    /// # Errors
    ///
    /// Returns `Err` on malformed input or a wire-shape mismatch; the whole
    /// decode aborts and no partial value is produced.
    fn decode_json(reader: &mut JsonReader<'_>, names: &PropertyNameTable) -> Result<Self>;
}

/// Enum wire contract: values cross the wire as their underlying `i32`.
///
/// Implemented by `#[derive(WireEnum)]`; resolved by field codecs the same
/// way nested object types are.
pub trait WireEnum: Sized + Copy {
    fn to_wire(self) -> i32;

    /// # Errors
    ///
    /// Returns `Err` for a wire value that maps to no variant.
    fn from_wire(raw: i32) -> SerResult<Self>;
}

/// Serialize through the global registry. `None` encodes as `null`.
///
/// # Errors
///
/// Returns `Err` when encoding fails; see [`Dto::encode_fields`].
pub fn to_json<T: Dto>(value: Option<&T>) -> Result<Vec<u8>> {
    crate::codec::registry::global().get::<T>().serialize(value)
}

/// Deserialize through the global registry. The `null` literal yields
/// `Ok(None)`.
///
/// # Errors
///
/// Returns `Err` on malformed input; see [`Dto::decode_json`].
pub fn from_json<T: Dto>(bytes: &[u8]) -> Result<Option<T>> {
    crate::codec::registry::global().get::<T>().deserialize(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnregisteredType("WalletInfo".into());
        assert_eq!(format!("{}", err), "no codec registered for type: WalletInfo");

        let err = Error::ValueTypeMismatch("WalletInfo");
        assert_eq!(format!("{}", err), "value is not an instance of WalletInfo");

        let err: Error = SerError::InvalidData {
            reason: "broken".into(),
        }
        .into();
        assert_eq!(format!("{}", err), "serialization failed: invalid data: broken");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;
        let err: Error = SerError::InvalidData {
            reason: "broken".into(),
        }
        .into();
        assert!(err.source().is_some());
        assert!(Error::UnregisteredType("X".into()).source().is_none());
    }
}
