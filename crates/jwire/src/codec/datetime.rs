// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dedicated date-time sub-codec.
//!
//! Timestamps cross the wire as RFC 3339 strings in UTC with millisecond
//! precision, e.g. `"2026-08-06T12:34:56.789Z"`. Decode accepts any RFC 3339
//! offset and normalizes to UTC.

use crate::core::ser::{JsonReader, JsonWriter, SerError, SerResult};
use chrono::{DateTime, SecondsFormat, Utc};

/// Default for absent timestamp fields (`DateTime<Utc>` has no `Default`).
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn encode(value: &DateTime<Utc>, w: &mut JsonWriter) -> SerResult<()> {
    w.write_string(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn decode(r: &mut JsonReader<'_>) -> SerResult<DateTime<Utc>> {
    let s = r.read_string()?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| SerError::InvalidData {
            reason: format!("invalid RFC 3339 timestamp: {}", s),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_roundtrip_utc() {
        let t0 = Utc
            .with_ymd_and_hms(2026, 8, 6, 12, 34, 56)
            .single()
            .expect("timestamp should be valid");

        let mut w = JsonWriter::new();
        encode(&t0, &mut w).expect("encode should succeed");
        assert_eq!(w.as_bytes(), b"\"2026-08-06T12:34:56.000Z\"");

        let mut r = JsonReader::new(w.as_bytes());
        let back = decode(&mut r).expect("decode should succeed");
        assert_eq!(back, t0);
    }

    #[test]
    fn test_decode_normalizes_offset_to_utc() {
        let mut r = JsonReader::new(b"\"2026-08-06T14:34:56.000+02:00\"");
        let t = decode(&mut r).expect("decode should succeed");
        assert_eq!(t.to_rfc3339_opts(SecondsFormat::Millis, true), "2026-08-06T12:34:56.000Z");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode(&mut JsonReader::new(b"\"yesterday\"")).is_err());
        assert!(decode(&mut JsonReader::new(b"\"2026-13-01T00:00:00Z\"")).is_err());
        // Wrong wire shape: a number is not a timestamp string.
        assert!(decode(&mut JsonReader::new(b"1754483696")).is_err());
    }

    #[test]
    fn test_epoch_default() {
        assert_eq!(epoch().timestamp(), 0);
    }
}
