// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Allocation-free property-name matching.
//!
//! A decode loop sees each property name as a raw UTF-8 byte slice. Matching
//! it against the field set through a `String` + hash map would allocate per
//! property per decode; instead a byte trie is built once per type at codec
//! construction and queried in O(name length). Immutable after build, safe
//! for concurrent read-only use.

use crate::core::types::FieldDescriptor;

#[derive(Debug)]
struct Node {
    /// Outgoing edges, sorted by byte for binary search.
    edges: Vec<(u8, u32)>,
    /// Wire index when a field name ends at this node.
    wire_index: Option<u32>,
}

/// Immutable byte trie from wire property names to wire indices.
#[derive(Debug)]
pub struct PropertyNameTable {
    nodes: Vec<Node>,
}

impl PropertyNameTable {
    /// Build the table from a type's field descriptors.
    ///
    /// Wire names are unique per type (enforced by the derive macro).
    #[must_use]
    pub fn build(fields: &[FieldDescriptor]) -> Self {
        let mut nodes = vec![Node {
            edges: Vec::new(),
            wire_index: None,
        }];
        for field in fields {
            let mut node = 0usize;
            for &b in field.wire_name.as_bytes() {
                let next = match nodes[node].edges.binary_search_by_key(&b, |e| e.0) {
                    Ok(pos) => nodes[node].edges[pos].1 as usize,
                    Err(pos) => {
                        let next = nodes.len();
                        nodes.push(Node {
                            edges: Vec::new(),
                            wire_index: None,
                        });
                        nodes[node].edges.insert(pos, (b, next as u32));
                        next
                    }
                };
                node = next;
            }
            debug_assert!(
                nodes[node].wire_index.is_none(),
                "duplicate wire name {}",
                field.wire_name
            );
            nodes[node].wire_index = Some(field.wire_index);
        }
        Self { nodes }
    }

    /// Resolve raw property-name bytes to a wire index, or `None` for an
    /// unknown property. No allocation, no string construction.
    #[must_use]
    pub fn lookup(&self, name: &[u8]) -> Option<u32> {
        let mut node = 0usize;
        for &b in name {
            let edges = &self.nodes[node].edges;
            match edges.binary_search_by_key(&b, |e| e.0) {
                Ok(pos) => node = edges[pos].1 as usize,
                Err(_) => return None,
            }
        }
        self.nodes[node].wire_index
    }
}
