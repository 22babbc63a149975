// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # jwire - schema-driven JSON codec for backend DTOs
//!
//! A zero-reflection JSON codec: `#[derive(Dto)]` commits each data-transfer
//! type's field layout at compile time, and a process-lifetime registry
//! hands out one immutable codec object per type. Built for service SDKs
//! that marshal fixed DTO schemas (wallets, orders, entitlements, ...)
//! against a backend API where property spelling and value shape are a
//! compatibility contract.
//!
//! ## Quick Start
//!
//! ```rust
//! use jwire::{from_json, to_json, Dto};
//!
//! #[derive(Dto, Debug, Default, PartialEq)]
//! struct Wallet {
//!     id: String,
//!     balance: i32,
//! }
//!
//! fn main() -> jwire::Result<()> {
//!     let wallet = Wallet { id: "w1".into(), balance: 500 };
//!
//!     let bytes = to_json(Some(&wallet))?;
//!     assert_eq!(bytes, br#"{"id":"w1","balance":500}"#);
//!
//!     let back = from_json::<Wallet>(&bytes)?;
//!     assert_eq!(back, Some(wallet));
//!     Ok(())
//! }
//! ```
//!
//! ## Wire contract
//!
//! - Fields serialize in declaration order under their exact wire names
//!   (`#[dto(rename = "...")]` when the member spelling must differ).
//! - A `null` root maps to `None` in both directions.
//! - Unknown incoming properties are skipped losslessly — decoding never
//!   fails because the backend grew a field.
//! - Absent properties leave members at their defaults; there is no
//!   "required field" concept.
//! - Malformed input fails the whole decode; no partial DTO is returned.
//!
//! ## Modules Overview
//!
//! - [`api`] - `Dto`/`WireEnum` contracts, `Error`, `to_json`/`from_json`
//! - [`codec`] - per-type codec objects, property-name matcher, registry
//! - [`core`] - JSON read/write cursors and type descriptors

// Allow the derive macros to work inside this crate's tests
extern crate self as jwire;

/// Public codec contracts and error type.
pub mod api;
/// Per-type codecs, property-name matching, datetime sub-codec, registry.
pub mod codec;
/// Low-level wire primitives and type metadata.
pub mod core;

pub use api::{from_json, to_json, Error, Result};
pub use api::{Dto as DtoTrait, WireEnum as WireEnumTrait}; // Traits (for type bounds)
pub use jwire_codegen::{Dto, WireEnum}; // Derive macros (for #[derive(jwire::Dto)])

pub use codec::registry::{CodecRegistry, LookupStats};
pub use core::ser::{JsonReader, JsonWriter, SerError};
pub use core::types::TypeDescriptor;
