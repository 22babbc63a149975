// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type metadata for DTO codecs.

pub mod descriptor;

pub use descriptor::{fnv1a_32, FieldDescriptor, TypeDescriptor, ValueKind};
