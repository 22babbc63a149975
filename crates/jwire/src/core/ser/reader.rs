// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Streaming JSON reader over a borrowed byte buffer.
//!
//! The reader is a plain offset cursor: every method reads forward, errors
//! carry the offset they failed at, and nothing is buffered or allocated
//! unless a string actually contains escape sequences. Property names come
//! back as raw UTF-8 byte slices so the caller can match them without
//! building an intermediate `String` (see `codec::matcher`).

use super::{SerError, SerResult};
use std::borrow::Cow;

/// Generate exact-width integer readers (eliminates code duplication)
///
/// Each generated method:
/// 1. Scans one JSON number literal
/// 2. Rejects fractional/exponent forms (integer fields take integer literals)
/// 3. Parses at the declared width; overflow is a type mismatch, never a wrap
macro_rules! impl_read_int {
    ($name:ident, $type:ty, $expected:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            self.skip_ws();
            let at = self.offset;
            let s = self.number_slice()?;
            if s.contains(['.', 'e', 'E']) {
                return Err(SerError::TypeMismatch {
                    offset: at,
                    expected: $expected,
                });
            }
            s.parse::<$type>().map_err(|_| SerError::TypeMismatch {
                offset: at,
                expected: $expected,
            })
        }
    };
}

/// Generate exact-width float readers.
///
/// The literal is parsed directly at the declared width: an `f32` field is
/// never parsed as `f64` and narrowed, so precision behaves identically on
/// decode and re-encode. A literal overflowing the width to infinity is out
/// of range, not a valid value (the writer refuses non-finite floats, so
/// accepting it would break re-encode).
macro_rules! impl_read_float {
    ($name:ident, $type:ty, $expected:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            self.skip_ws();
            let at = self.offset;
            let s = self.number_slice()?;
            match s.parse::<$type>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(SerError::TypeMismatch {
                    offset: at,
                    expected: $expected,
                }),
            }
        }
    };
}

/// Borrowing JSON reader (bounds-checked, zero-copy)
pub struct JsonReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> JsonReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    fn read_err(&self, reason: &str) -> SerError {
        SerError::ReadFailed {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&b) = self.buf.get(self.offset) {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Peek the first byte of the next token.
    pub fn peek_token(&mut self) -> SerResult<u8> {
        self.skip_ws();
        self.buf
            .get(self.offset)
            .copied()
            .ok_or_else(|| self.read_err("unexpected end of input"))
    }

    /// Consume one expected structural byte (`{`, `}`, `[`, `]`, `:`, `,`).
    pub fn expect(&mut self, byte: u8) -> SerResult<()> {
        let got = self.peek_token()?;
        if got == byte {
            self.offset += 1;
            Ok(())
        } else {
            Err(SerError::ReadFailed {
                offset: self.offset,
                reason: format!("expected '{}', found '{}'", byte as char, got as char),
            })
        }
    }

    /// Consume `byte` if it is the next token; report whether it was.
    pub fn try_consume(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.buf.get(self.offset) == Some(&byte) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Consume a `null` literal if present.
    pub fn try_consume_null(&mut self) -> bool {
        self.try_literal(b"null")
    }

    fn try_literal(&mut self, lit: &'static [u8]) -> bool {
        self.skip_ws();
        let end = self.offset + lit.len();
        if end <= self.buf.len()
            && &self.buf[self.offset..end] == lit
            && !self.buf.get(end).is_some_and(u8::is_ascii_alphanumeric)
        {
            self.offset = end;
            true
        } else {
            false
        }
    }

    pub fn read_bool(&mut self) -> SerResult<bool> {
        if self.try_literal(b"true") {
            return Ok(true);
        }
        if self.try_literal(b"false") {
            return Ok(false);
        }
        Err(SerError::TypeMismatch {
            offset: self.offset,
            expected: "boolean",
        })
    }

    // Generate numeric readers via macro (DRY principle)
    impl_read_int!(read_i32, i32, "int32");
    impl_read_int!(read_i64, i64, "int64");
    impl_read_int!(read_u32, u32, "uint32");
    impl_read_float!(read_f32, f32, "float32");
    impl_read_float!(read_f64, f64, "float64");

    /// Read one string value into an owned, UTF-8 validated `String`.
    pub fn read_string(&mut self) -> SerResult<String> {
        match self.read_string_bytes()? {
            Cow::Borrowed(b) => std::str::from_utf8(b).map(str::to_owned).map_err(|_| {
                SerError::InvalidData {
                    reason: "invalid UTF-8 in string".into(),
                }
            }),
            Cow::Owned(v) => String::from_utf8(v).map_err(|_| SerError::InvalidData {
                reason: "invalid UTF-8 in string".into(),
            }),
        }
    }

    /// Read one property name as raw UTF-8 bytes.
    ///
    /// Borrows from the input unless the name contains escape sequences;
    /// the common path allocates nothing.
    pub fn read_property_name(&mut self) -> SerResult<Cow<'a, [u8]>> {
        self.read_string_bytes()
    }

    fn read_string_bytes(&mut self) -> SerResult<Cow<'a, [u8]>> {
        self.skip_ws();
        if self.buf.get(self.offset) != Some(&b'"') {
            return Err(SerError::TypeMismatch {
                offset: self.offset,
                expected: "string",
            });
        }
        self.offset += 1;
        let start = self.offset;
        let mut i = start;
        while i < self.buf.len() {
            match self.buf[i] {
                b'"' => {
                    self.offset = i + 1;
                    return Ok(Cow::Borrowed(&self.buf[start..i]));
                }
                b'\\' => return self.read_string_bytes_escaped(start, i),
                b if b < 0x20 => {
                    return Err(SerError::InvalidData {
                        reason: "unescaped control character in string".into(),
                    })
                }
                _ => i += 1,
            }
        }
        self.offset = i;
        Err(self.read_err("unterminated string"))
    }

    /// Slow path: the string contains at least one escape sequence.
    fn read_string_bytes_escaped(
        &mut self,
        start: usize,
        first_escape: usize,
    ) -> SerResult<Cow<'a, [u8]>> {
        let mut out = Vec::with_capacity(self.buf.len().min(first_escape - start + 16));
        out.extend_from_slice(&self.buf[start..first_escape]);
        let mut i = first_escape;
        loop {
            let Some(&b) = self.buf.get(i) else {
                self.offset = i;
                return Err(self.read_err("unterminated string"));
            };
            match b {
                b'"' => {
                    self.offset = i + 1;
                    return Ok(Cow::Owned(out));
                }
                b'\\' => {
                    let Some(&esc) = self.buf.get(i + 1) else {
                        self.offset = i + 1;
                        return Err(self.read_err("unterminated escape sequence"));
                    };
                    i += 2;
                    match esc {
                        b'"' => out.push(b'"'),
                        b'\\' => out.push(b'\\'),
                        b'/' => out.push(b'/'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'u' => {
                            let ch = self.read_escaped_char(&mut i)?;
                            let mut utf8 = [0u8; 4];
                            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                        }
                        _ => {
                            return Err(SerError::InvalidData {
                                reason: "invalid escape sequence".into(),
                            })
                        }
                    }
                }
                b if b < 0x20 => {
                    return Err(SerError::InvalidData {
                        reason: "unescaped control character in string".into(),
                    })
                }
                b => {
                    out.push(b);
                    i += 1;
                }
            }
        }
    }

    /// Decode one `\uXXXX` code unit (plus a trailing low surrogate when the
    /// first unit is a high surrogate). `i` points just past the `u`.
    fn read_escaped_char(&self, i: &mut usize) -> SerResult<char> {
        let unit = self.read_hex4(i)?;
        if (0xDC00..0xE000).contains(&unit) {
            return Err(SerError::InvalidData {
                reason: "unpaired low surrogate in \\u escape".into(),
            });
        }
        if (0xD800..0xDC00).contains(&unit) {
            if self.buf.get(*i) != Some(&b'\\') || self.buf.get(*i + 1) != Some(&b'u') {
                return Err(SerError::InvalidData {
                    reason: "unpaired high surrogate in \\u escape".into(),
                });
            }
            *i += 2;
            let low = self.read_hex4(i)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(SerError::InvalidData {
                    reason: "invalid surrogate pair in \\u escape".into(),
                });
            }
            let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            return char::from_u32(code).ok_or_else(|| SerError::InvalidData {
                reason: "invalid surrogate pair in \\u escape".into(),
            });
        }
        char::from_u32(u32::from(unit)).ok_or_else(|| SerError::InvalidData {
            reason: "invalid \\u escape".into(),
        })
    }

    fn read_hex4(&self, i: &mut usize) -> SerResult<u16> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let Some(&b) = self.buf.get(*i) else {
                return Err(SerError::ReadFailed {
                    offset: *i,
                    reason: "unterminated \\u escape".into(),
                });
            };
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(SerError::InvalidData {
                        reason: "non-hex digit in \\u escape".into(),
                    })
                }
            };
            unit = (unit << 4) | u16::from(digit);
            *i += 1;
        }
        Ok(unit)
    }

    /// Scan one JSON number literal and return it as a `&str` slice.
    ///
    /// Grammar per RFC 8259: `-? (0 | [1-9][0-9]*) frac? exp?`.
    fn number_slice(&mut self) -> SerResult<&'a str> {
        self.skip_ws();
        let start = self.offset;
        let mut i = start;
        if self.buf.get(i) == Some(&b'-') {
            i += 1;
        }
        let int_start = i;
        while self.buf.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == int_start {
            return Err(SerError::TypeMismatch {
                offset: start,
                expected: "number",
            });
        }
        if self.buf[int_start] == b'0' && i - int_start > 1 {
            return Err(SerError::InvalidData {
                reason: "number has a leading zero".into(),
            });
        }
        if self.buf.get(i) == Some(&b'.') {
            i += 1;
            let frac_start = i;
            while self.buf.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == frac_start {
                return Err(SerError::InvalidData {
                    reason: "number has no digits after decimal point".into(),
                });
            }
        }
        if matches!(self.buf.get(i), Some(b'e' | b'E')) {
            i += 1;
            if matches!(self.buf.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            let exp_start = i;
            while self.buf.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == exp_start {
                return Err(SerError::InvalidData {
                    reason: "number has no digits in exponent".into(),
                });
            }
        }
        self.offset = i;
        // The scanned range is ASCII by construction.
        std::str::from_utf8(&self.buf[start..i]).map_err(|_| SerError::InvalidData {
            reason: "non-ASCII bytes in number".into(),
        })
    }

    /// Skip one JSON value of unknown shape losslessly.
    ///
    /// Arrays and objects are skipped with depth tracking; truncated input
    /// is an error. This is the forward-compatibility primitive: unknown
    /// properties are consumed here and never fail the decode.
    pub fn skip_value(&mut self) -> SerResult<()> {
        match self.peek_token()? {
            b'"' => self.read_string_bytes().map(|_| ()),
            b'{' | b'[' => self.skip_container(),
            b't' | b'f' => self.read_bool().map(|_| ()),
            b'n' => {
                if self.try_consume_null() {
                    Ok(())
                } else {
                    Err(self.read_err("expected a JSON value"))
                }
            }
            b'-' | b'0'..=b'9' => self.number_slice().map(|_| ()),
            _ => Err(self.read_err("expected a JSON value")),
        }
    }

    fn skip_container(&mut self) -> SerResult<()> {
        let mut depth = 0usize;
        loop {
            self.skip_ws();
            let Some(&b) = self.buf.get(self.offset) else {
                return Err(self.read_err("unexpected end of input inside skipped value"));
            };
            match b {
                b'{' | b'[' => {
                    depth += 1;
                    self.offset += 1;
                }
                b'}' | b']' => {
                    depth = depth.saturating_sub(1);
                    self.offset += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'"' => {
                    self.read_string_bytes()?;
                }
                _ => self.offset += 1,
            }
        }
    }

    /// After the root value only whitespace may remain.
    pub fn expect_end(&mut self) -> SerResult<()> {
        self.skip_ws();
        if self.offset < self.buf.len() {
            return Err(SerError::InvalidData {
                reason: "trailing characters after JSON document".into(),
            });
        }
        Ok(())
    }
}
