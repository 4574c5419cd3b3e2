// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Headers
//!
//! String-to-string headers attached to every thing event. Headers carry
//! cross-cutting request context (e.g. `correlation-id`) end to end; the
//! reducer itself reads exactly one namespace: keys prefixed with
//! `ditto-metadata:`, the side-channel through which callers attach
//! per-field provenance (see [`crate::reducer::metadata_deriver`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key prefix for metadata derivation headers.
pub const METADATA_HEADER_PREFIX: &str = "ditto-metadata:";

/// Metadata key carrying the issued-at provenance timestamp.
pub const ISSUED_AT_KEY: &str = "issuedAt";

/// Conventional header key correlating events across a request flow.
pub const CORRELATION_ID_HEADER: &str = "correlation-id";

/// Ordered string-to-string header map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventHeaders(BTreeMap<String, String>);

impl EventHeaders {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a header.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a header value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether no headers are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate all headers in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `correlation-id` header, if present.
    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID_HEADER)
    }

    /// Look up a `ditto-metadata:`-namespaced value by its key suffix.
    pub fn metadata_value(&self, suffix: &str) -> Option<&str> {
        self.get(&format!("{METADATA_HEADER_PREFIX}{suffix}"))
    }

    /// Iterate all `ditto-metadata:` entries as `(suffix, value)` pairs.
    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(k, v)| {
            k.strip_prefix(METADATA_HEADER_PREFIX)
                .map(|suffix| (suffix, v.as_str()))
        })
    }
}

impl FromIterator<(String, String)> for EventHeaders {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
