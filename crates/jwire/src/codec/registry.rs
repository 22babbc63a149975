// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-lifetime codec registry.
//!
//! Maps a runtime type to its codec instance. Codecs are built lazily on
//! first request, under the map's write lock so concurrent first use
//! constructs exactly one instance per type, and are never evicted: the
//! registry only grows, and after warm-up every lookup is a read-lock +
//! `Arc` clone. A secondary name index supports diagnostics lookups by
//! wire type name.
//!
//! Requesting a codec for a type that was never registered is a
//! configuration error (`Error::UnregisteredType`), not a recoverable
//! runtime condition: callers must fail the whole marshalling operation
//! rather than silently skip the value.

use crate::api::{Dto, Error, Result};
use crate::codec::{Codec, ErasedCodec};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Registry hit/miss statistics.
///
/// `constructions` counts actual codec builds; concurrent first use of one
/// type must increment it exactly once.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub constructions: u64,
}

/// One registered codec, held both erased (dynamic callers) and as `Any`
/// (typed downcast back to `Arc<Codec<T>>`). Both point at one allocation.
struct CodecSlot {
    erased: Arc<dyn ErasedCodec>,
    typed: Arc<dyn Any + Send + Sync>,
}

/// Append-only registry of per-type codecs.
pub struct CodecRegistry {
    codecs: RwLock<HashMap<TypeId, CodecSlot>>,
    by_name: DashMap<&'static str, TypeId>,
    hits: AtomicU64,
    misses: AtomicU64,
    constructions: AtomicU64,
}

/// Global registry used by generated code and the `to_json`/`from_json`
/// helpers. Initialization is idempotent.
pub fn global() -> &'static CodecRegistry {
    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(CodecRegistry::new)
}

impl CodecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
            by_name: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            constructions: AtomicU64::new(0),
        }
    }

    /// Codec for `T`, building and caching it on first use.
    ///
    /// The fast path is a read lock and an `Arc` clone. The build path
    /// re-checks under the write lock so racing first users all receive
    /// the one instance that won.
    pub fn get<T: Dto>(&self) -> Arc<Codec<T>> {
        let key = TypeId::of::<T>();

        if let Some(slot) = self.codecs.read().get(&key) {
            if let Ok(codec) = Arc::clone(&slot.typed).downcast::<Codec<T>>() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return codec;
            }
        }

        let mut codecs = self.codecs.write();
        if let Some(slot) = codecs.get(&key) {
            if let Ok(codec) = Arc::clone(&slot.typed).downcast::<Codec<T>>() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return codec;
            }
        }

        let codec = Arc::new(Codec::<T>::build());
        let descriptor = codec.descriptor();
        codecs.insert(
            key,
            CodecSlot {
                erased: Arc::clone(&codec) as Arc<dyn ErasedCodec>,
                typed: Arc::clone(&codec) as Arc<dyn Any + Send + Sync>,
            },
        );
        self.by_name.insert(descriptor.type_name, key);
        self.constructions.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "[CodecRegistry] built codec for {} (type_id {:08x}, {} fields)",
            descriptor.type_name,
            descriptor.type_id,
            descriptor.fields.len()
        );
        codec
    }

    /// Eagerly build and cache the codec for `T`. Safe to call repeatedly
    /// and from multiple subsystems requesting the same type.
    pub fn register<T: Dto>(&self) {
        let _ = self.get::<T>();
    }

    /// Erased codec lookup by runtime type id. Never builds: an
    /// unregistered type is a configuration error surfaced to the caller.
    pub fn resolve(&self, type_id: TypeId) -> Result<Arc<dyn ErasedCodec>> {
        match self.codecs.read().get(&type_id) {
            Some(slot) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Arc::clone(&slot.erased))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Err(Error::UnregisteredType(format!("{:?}", type_id)))
            }
        }
    }

    /// Erased codec lookup by wire type name (diagnostics path).
    pub fn resolve_by_name(&self, type_name: &str) -> Result<Arc<dyn ErasedCodec>> {
        let key = self
            .by_name
            .get(type_name)
            .map(|entry| *entry.value())
            .ok_or_else(|| Error::UnregisteredType(type_name.to_owned()))?;
        self.resolve(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
