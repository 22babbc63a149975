// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Round-trip coverage for derive-generated codecs: exact wire bytes for the
// canonical wallet scenario, field-wise equality for a DTO exercising every
// supported value kind, and a randomized sweep.

use chrono::{DateTime, TimeZone, Utc};
use jwire::{from_json, to_json, Dto, WireEnum};
use std::collections::HashMap;

#[derive(Dto, Debug, PartialEq, Clone)]
struct WalletInfo {
    id: String,
    balance: i32,
    #[dto(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

#[derive(WireEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OrderStatus {
    #[default]
    Created = 0,
    Fulfilled = 1,
    Refunded = 4,
}

#[derive(Dto, Debug, Default, PartialEq, Clone)]
struct CurrencyInfo {
    code: String,
    decimals: i32,
}

#[derive(Dto, Debug, Default, PartialEq, Clone)]
struct OrderItem {
    sku: String,
    quantity: u32,
    price: f64,
}

#[derive(Dto, Debug, PartialEq, Clone)]
struct OrderInfo {
    #[dto(rename = "orderNo")]
    order_no: String,
    #[dto(rename = "userId")]
    user_id: String,
    total: i64,
    #[dto(rename = "discountRate")]
    discount_rate: f32,
    refundable: bool,
    #[dto(enumeration)]
    status: OrderStatus,
    #[dto(rename = "createdAt")]
    created_at: DateTime<Utc>,
    note: Option<String>,
    currency: Option<CurrencyInfo>,
    items: Vec<OrderItem>,
    tags: Vec<String>,
    attributes: HashMap<String, String>,
    #[dto(rename = "regionPrices")]
    region_prices: Option<Vec<f64>>,
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, 12, 34, 56)
        .single()
        .expect("timestamp should be valid")
}

#[test]
fn wallet_serializes_in_declaration_order() {
    let wallet = WalletInfo {
        id: "w1".into(),
        balance: 500,
        created_at: t0(),
    };

    let bytes = to_json(Some(&wallet)).expect("serialize should succeed");
    assert_eq!(
        bytes,
        br#"{"id":"w1","balance":500,"createdAt":"2026-08-06T12:34:56.000Z"}"#
    );

    let back = from_json::<WalletInfo>(&bytes)
        .expect("deserialize should succeed")
        .expect("value should be present");
    assert_eq!(back, wallet);
}

#[test]
fn null_root_both_directions() {
    assert_eq!(
        to_json::<WalletInfo>(None).expect("serialize should succeed"),
        b"null"
    );
    assert_eq!(
        from_json::<WalletInfo>(b"null").expect("deserialize should succeed"),
        None
    );
}

#[test]
fn fully_populated_order_roundtrips() {
    let order = OrderInfo {
        order_no: "ord-123".into(),
        user_id: "u-9".into(),
        total: 123_456_789_000,
        discount_rate: 0.15,
        refundable: true,
        status: OrderStatus::Refunded,
        created_at: t0(),
        note: Some("gift \"wrap\"\n".into()),
        currency: Some(CurrencyInfo {
            code: "USD".into(),
            decimals: 2,
        }),
        items: vec![
            OrderItem {
                sku: "sword".into(),
                quantity: 2,
                price: 9.99,
            },
            OrderItem {
                sku: "shield".into(),
                quantity: 1,
                price: 24.5,
            },
        ],
        tags: vec!["vip".into(), "promo".into()],
        attributes: HashMap::from([("campaign".to_owned(), "summer".to_owned())]),
        region_prices: Some(vec![9.99, 8.25]),
    };

    let bytes = to_json(Some(&order)).expect("serialize should succeed");
    let back = from_json::<OrderInfo>(&bytes)
        .expect("deserialize should succeed")
        .expect("value should be present");
    assert_eq!(back, order);
}

#[test]
fn default_valued_order_roundtrips() {
    let order = OrderInfo {
        order_no: String::new(),
        user_id: String::new(),
        total: 0,
        discount_rate: 0.0,
        refundable: false,
        status: OrderStatus::Created,
        created_at: jwire::codec::datetime::epoch(),
        note: None,
        currency: None,
        items: Vec::new(),
        tags: Vec::new(),
        attributes: HashMap::new(),
        region_prices: None,
    };

    let bytes = to_json(Some(&order)).expect("serialize should succeed");
    let back = from_json::<OrderInfo>(&bytes)
        .expect("deserialize should succeed")
        .expect("value should be present");
    assert_eq!(back, order);
}

#[test]
fn nullable_fields_write_null_literals() {
    let order = OrderInfo {
        order_no: "o".into(),
        user_id: "u".into(),
        total: 1,
        discount_rate: 0.0,
        refundable: false,
        status: OrderStatus::Created,
        created_at: t0(),
        note: None,
        currency: None,
        items: Vec::new(),
        tags: Vec::new(),
        attributes: HashMap::new(),
        region_prices: None,
    };

    let bytes = to_json(Some(&order)).expect("serialize should succeed");
    let text = String::from_utf8(bytes).expect("wire bytes should be UTF-8");
    assert!(text.contains(r#""note":null"#), "wire text: {text}");
    assert!(text.contains(r#""currency":null"#), "wire text: {text}");
    assert!(text.contains(r#""regionPrices":null"#), "wire text: {text}");
    // Empty containers still serialize as empty containers, not null.
    assert!(text.contains(r#""items":[]"#), "wire text: {text}");
    assert!(text.contains(r#""attributes":{}"#), "wire text: {text}");
}

#[test]
fn enum_crosses_wire_as_underlying_i32() {
    let order = OrderInfo {
        order_no: "o".into(),
        user_id: "u".into(),
        total: 0,
        discount_rate: 0.0,
        refundable: false,
        status: OrderStatus::Refunded,
        created_at: t0(),
        note: None,
        currency: None,
        items: Vec::new(),
        tags: Vec::new(),
        attributes: HashMap::new(),
        region_prices: None,
    };

    let bytes = to_json(Some(&order)).expect("serialize should succeed");
    let text = String::from_utf8(bytes).expect("wire bytes should be UTF-8");
    assert!(text.contains(r#""status":4"#), "wire text: {text}");
}

#[test]
fn float32_width_is_preserved() {
    // 0.1 is not exactly representable; the f32 and f64 roundings differ.
    // The wire literal must round-trip at 32-bit width with no widening.
    let order = OrderInfo {
        order_no: "o".into(),
        user_id: "u".into(),
        total: 0,
        discount_rate: 0.1_f32,
        refundable: false,
        status: OrderStatus::Created,
        created_at: t0(),
        note: None,
        currency: None,
        items: Vec::new(),
        tags: Vec::new(),
        attributes: HashMap::new(),
        region_prices: None,
    };

    let bytes = to_json(Some(&order)).expect("serialize should succeed");
    let text = String::from_utf8(bytes.clone()).expect("wire bytes should be UTF-8");
    assert!(text.contains(r#""discountRate":0.1"#), "wire text: {text}");

    let once = from_json::<OrderInfo>(&bytes)
        .expect("deserialize should succeed")
        .expect("value should be present");
    assert_eq!(once.discount_rate, 0.1_f32);

    // Second trip is byte-stable: precision was lost (if at all) exactly once.
    let again = to_json(Some(&once)).expect("serialize should succeed");
    assert_eq!(again, bytes);
}

#[test]
fn randomized_wallets_roundtrip() {
    fastrand::seed(0x5eed);
    for _ in 0..200 {
        let len = fastrand::usize(0..24);
        let id: String = (0..len)
            .map(|_| {
                // Bias toward characters that exercise escaping.
                match fastrand::u8(0..6) {
                    0 => '"',
                    1 => '\\',
                    2 => '\n',
                    3 => char::from_u32(fastrand::u32(0x20..0x2FF)).unwrap_or('x'),
                    _ => fastrand::alphanumeric(),
                }
            })
            .collect();
        let wallet = WalletInfo {
            id,
            balance: fastrand::i32(..),
            created_at: Utc
                .timestamp_opt(i64::from(fastrand::u32(..)), 0)
                .single()
                .expect("timestamp should be valid"),
        };

        let bytes = to_json(Some(&wallet)).expect("serialize should succeed");
        let back = from_json::<WalletInfo>(&bytes)
            .expect("deserialize should succeed")
            .expect("value should be present");
        assert_eq!(back, wallet);
    }
}

#[test]
fn whitespace_tolerant_decode() {
    let padded = br#"
        {
            "id" :  "w1" ,
            "balance"
                : 500,
            "createdAt": "2026-08-06T12:34:56.000Z"
        }
    "#;
    let wallet = from_json::<WalletInfo>(padded)
        .expect("deserialize should succeed")
        .expect("value should be present");
    assert_eq!(wallet.id, "w1");
    assert_eq!(wallet.balance, 500);
    assert_eq!(wallet.created_at, t0());
}
