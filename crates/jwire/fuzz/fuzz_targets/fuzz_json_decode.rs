// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for JSON decoding
//!
//! Feeds arbitrary bytes to the reader primitives and a derive-generated
//! codec. None of these operations should panic on any input; malformed
//! payloads must surface as errors.

#![no_main]

use jwire::Dto;
use libfuzzer_sys::fuzz_target;

#[derive(Dto, Debug, Default, PartialEq)]
struct FuzzOrder {
    id: String,
    total: i64,
    rate: f32,
    open: bool,
    tags: Vec<String>,
    note: Option<String>,
}

fuzz_target!(|data: &[u8]| {
    // ----------------------------------------------------------------
    // 1. Fuzz low-level reader primitives - must not panic
    // ----------------------------------------------------------------
    {
        let mut r = jwire::JsonReader::new(data);
        let _ = r.read_i32();
        let _ = r.read_i64();
        let _ = r.read_u32();
        let _ = r.read_f32();
        let _ = r.read_f64();
        let _ = r.read_bool();
        let _ = r.read_string();
    }

    // ----------------------------------------------------------------
    // 2. Fuzz the lossless skip - must not panic, must terminate
    // ----------------------------------------------------------------
    {
        let mut r = jwire::JsonReader::new(data);
        while r.remaining() > 0 {
            if r.skip_value().is_err() {
                break;
            }
        }
    }

    // ----------------------------------------------------------------
    // 3. Fuzz a full codec decode - must not panic
    // ----------------------------------------------------------------
    let _ = jwire::from_json::<FuzzOrder>(data);

    // ----------------------------------------------------------------
    // 4. Decoded values must re-encode cleanly (round-trip stability)
    // ----------------------------------------------------------------
    if let Ok(Some(order)) = jwire::from_json::<FuzzOrder>(data) {
        let bytes = jwire::to_json(Some(&order)).expect("re-encode should succeed");
        let again = jwire::from_json::<FuzzOrder>(&bytes)
            .expect("re-decode should succeed")
            .expect("value should be present");
        assert_eq!(again, order);
    }
});
