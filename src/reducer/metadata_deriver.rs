// Copyright (c) 2025 - Cowboy AI, Inc.
//! Metadata Derivation
//!
//! Builds the provenance tree an event contributes to its thing. Two
//! sources feed the tree:
//!
//! 1. **Issued-at stamping**: every JSON leaf the event wrote gets an
//!    `issuedAt` entry at its full field path. The timestamp comes from
//!    the `ditto-metadata:issuedAt` header when present, otherwise from
//!    the event's own timestamp. With neither, no stamping happens: the
//!    reducer is forbidden from reading the wall clock, so there is no
//!    third source.
//! 2. **Explicit headers**: every other `ditto-metadata:<path>` header
//!    sets `<path>` in the tree to the header value.
//!
//! The result is merged into (never replaces) the thing's existing tree,
//! and deriving the same event twice folds to the same tree as once.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::domain::{FieldPath, MetadataTree};
use crate::events::{ThingEvent, ISSUED_AT_KEY};

/// Derive the metadata tree contributed by one event.
pub fn derive_metadata(event: &ThingEvent, issued_at_default: Option<DateTime<Utc>>) -> MetadataTree {
    let mut tree = MetadataTree::new();

    let issued_at = event
        .headers
        .metadata_value(ISSUED_AT_KEY)
        .map(str::to_string)
        .or_else(|| {
            issued_at_default.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        });

    if let Some(issued_at) = &issued_at {
        if let Some(payload) = event.payload_value() {
            stamp_leaves(&mut tree, &event.resource_path(), &payload, issued_at);
        }
    }

    for (suffix, value) in event.headers.metadata_entries() {
        if suffix == ISSUED_AT_KEY {
            continue;
        }
        match FieldPath::parse(suffix) {
            Ok(path) if !path.is_root() => tree.set_value(&path, value),
            _ => debug!(suffix = %suffix, "skipping unusable metadata header path"),
        }
    }

    tree
}

/// Recursively stamp `issuedAt` onto every leaf of `value`.
///
/// Non-empty objects recurse per key; everything else (scalars, arrays,
/// empty objects) is a leaf. Array elements are not stamped per index
/// because inserting an element would shift the provenance of every
/// following one. A `null` leaf is a removal (merged events), so it
/// carries no written value to stamp.
fn stamp_leaves(tree: &mut MetadataTree, path: &FieldPath, value: &Value, issued_at: &str) {
    match value {
        Value::Null => {}
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                stamp_leaves(tree, &path.child(key), child, issued_at);
            }
        }
        _ => tree.set_value(&path.child(ISSUED_AT_KEY), issued_at),
    }
}
