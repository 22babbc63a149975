// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Concurrent first-use contract: N racing callers all receive the same
// codec instance and exactly one construction occurs. Uses private
// registries so counters are isolated from other tests in the process.

use jwire::{CodecRegistry, Dto};
use std::sync::{Arc, Barrier};

#[derive(Dto, Debug, Default, PartialEq)]
struct PartyInfo {
    #[dto(rename = "partyId")]
    party_id: String,
    #[dto(rename = "maxMembers")]
    max_members: i32,
    joinable: bool,
}

#[derive(Dto, Debug, Default, PartialEq)]
struct FriendInfo {
    #[dto(rename = "friendId")]
    friend_id: String,
    #[dto(rename = "displayName")]
    display_name: String,
}

#[test]
fn concurrent_first_use_constructs_exactly_once() {
    let registry = Arc::new(CodecRegistry::new());
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                registry.get::<PartyInfo>()
            })
        })
        .collect();

    let codecs: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should not panic"))
        .collect();

    for codec in &codecs[1..] {
        assert!(
            Arc::ptr_eq(&codecs[0], codec),
            "all callers must share one codec instance"
        );
    }
    assert_eq!(registry.stats().constructions, 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_is_append_only_across_types() {
    let registry = CodecRegistry::new();
    registry.register::<PartyInfo>();
    registry.register::<FriendInfo>();
    registry.register::<PartyInfo>();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.stats().constructions, 2);

    // Warm lookups are hits, never rebuilds.
    let before = registry.stats();
    let _ = registry.get::<PartyInfo>();
    let _ = registry.get::<FriendInfo>();
    let after = registry.stats();
    assert_eq!(after.constructions, before.constructions);
    assert_eq!(after.hits, before.hits + 2);
}

#[test]
fn concurrent_encode_decode_after_warmup() {
    let registry = Arc::new(CodecRegistry::new());
    let codec = registry.get::<PartyInfo>();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = Arc::clone(&codec);
            std::thread::spawn(move || {
                let party = PartyInfo {
                    party_id: format!("p-{i}"),
                    max_members: i,
                    joinable: i % 2 == 0,
                };
                for _ in 0..200 {
                    let bytes = codec
                        .serialize(Some(&party))
                        .expect("serialize should succeed");
                    let back = codec
                        .deserialize(&bytes)
                        .expect("deserialize should succeed")
                        .expect("value should be present");
                    assert_eq!(back, party);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread should not panic");
    }
    assert_eq!(registry.stats().constructions, 1);
}

#[test]
fn erased_resolution_requires_registration() {
    let registry = CodecRegistry::new();
    assert!(registry.resolve_by_name("PartyInfo").is_err());

    registry.register::<PartyInfo>();
    let erased = registry
        .resolve_by_name("PartyInfo")
        .expect("resolve should succeed");
    assert_eq!(erased.descriptor().type_name, "PartyInfo");

    let party = PartyInfo {
        party_id: "p1".into(),
        max_members: 4,
        joinable: true,
    };
    let bytes = erased
        .serialize_any(Some(&party))
        .expect("serialize should succeed");
    assert_eq!(
        bytes,
        br#"{"partyId":"p1","maxMembers":4,"joinable":true}"#
    );
}
