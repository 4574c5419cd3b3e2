// Copyright (c) 2025 - Cowboy AI, Inc.
//! Metadata Tree
//!
//! Per-field provenance attached to a thing. The tree maps field path
//! segments to nodes; a node is either a metadata value (e.g. an
//! `issuedAt` timestamp string) or a branch of further segments. Setting
//! a value at a path creates intermediate branches as needed and never
//! clobbers metadata recorded at sibling paths.
//!
//! # Merge Semantics
//!
//! `merge(other)` is a recursive union where `other` wins per key. Folding
//! the same tree in twice yields the same result as folding it once, which
//! is what lets the reducer re-derive metadata from an event without
//! caring whether an earlier replay already did.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field_path::FieldPath;

/// One node of the metadata tree: a value leaf or a branch.
///
/// Serializes untagged, so the JSON form reads naturally:
/// `{"attributes": {"color": {"issuedAt": "2026-01-19T12:00:00Z"}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataNode {
    /// Metadata value at this exact path
    Value(String),

    /// Nested path segments
    Branch(BTreeMap<String, MetadataNode>),
}

/// Nested field-path → provenance mapping.
///
/// Keys are ordered (`BTreeMap`) so two equal trees serialize to
/// byte-identical JSON, which the reducer's determinism contract relies on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataTree(BTreeMap<String, MetadataNode>);

impl MetadataTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree holds no metadata at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set a metadata value at a path, creating intermediate branches.
    ///
    /// The final path segment is the metadata key (e.g. `issuedAt`). A
    /// value already present at an intermediate segment is widened into a
    /// branch; the root path is not addressable and is ignored.
    pub fn set_value(&mut self, path: &FieldPath, value: impl Into<String>) {
        fn set(nodes: &mut BTreeMap<String, MetadataNode>, segments: &[String], value: String) {
            match segments {
                [] => {}
                [key] => {
                    nodes.insert(key.clone(), MetadataNode::Value(value));
                }
                [head, rest @ ..] => {
                    let child = nodes
                        .entry(head.clone())
                        .or_insert_with(|| MetadataNode::Branch(BTreeMap::new()));
                    if let MetadataNode::Branch(children) = child {
                        set(children, rest, value);
                    } else {
                        let mut children = BTreeMap::new();
                        set(&mut children, rest, value);
                        *child = MetadataNode::Branch(children);
                    }
                }
            }
        }

        set(&mut self.0, path.segments(), value.into());
    }

    /// Look up the node at a path, `None` when absent (or for the root).
    pub fn get(&self, path: &FieldPath) -> Option<&MetadataNode> {
        let (head, rest) = path.split_first()?;
        let mut node = self.0.get(head)?;
        for segment in rest.segments() {
            match node {
                MetadataNode::Branch(children) => node = children.get(segment)?,
                MetadataNode::Value(_) => return None,
            }
        }
        Some(node)
    }

    /// Look up a metadata value (leaf) at a path.
    pub fn value_at(&self, path: &FieldPath) -> Option<&str> {
        match self.get(path)? {
            MetadataNode::Value(value) => Some(value),
            MetadataNode::Branch(_) => None,
        }
    }

    /// Fold another tree into this one.
    ///
    /// Recursive union; `other` wins where both sides hold a value or
    /// disagree on node shape. Idempotent: merging the same tree twice
    /// equals merging it once.
    pub fn merge(&mut self, other: MetadataTree) {
        fn merge_nodes(target: &mut BTreeMap<String, MetadataNode>, source: BTreeMap<String, MetadataNode>) {
            for (key, incoming) in source {
                match (target.get_mut(&key), incoming) {
                    (Some(MetadataNode::Branch(existing)), MetadataNode::Branch(children)) => {
                        merge_nodes(existing, children);
                    }
                    (_, incoming) => {
                        target.insert(key, incoming);
                    }
                }
            }
        }

        merge_nodes(&mut self.0, other.0);
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged(mut self, other: MetadataTree) -> Self {
        self.merge(other);
        self
    }
}
