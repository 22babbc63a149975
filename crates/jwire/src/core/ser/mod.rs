// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Low-level JSON encode/decode primitives for DTO wire payloads.

pub mod reader;
pub mod writer;

pub use reader::JsonReader;
pub use writer::JsonWriter;

use std::fmt;

/// Serialization error used within `core::ser`.
#[derive(Debug, Clone)]
pub enum SerError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
    TypeMismatch { offset: usize, expected: &'static str },
    InvalidData { reason: String },
    UnknownEnumValue { value: i32, type_name: &'static str },
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            SerError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            SerError::TypeMismatch { offset, expected } => {
                write!(f, "type mismatch at offset {}: expected {}", offset, expected)
            }
            SerError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
            SerError::UnknownEnumValue { value, type_name } => {
                write!(f, "unknown wire value {} for enum {}", value, type_name)
            }
        }
    }
}

impl std::error::Error for SerError {}

pub type SerResult<T> = core::result::Result<T, SerError>;
