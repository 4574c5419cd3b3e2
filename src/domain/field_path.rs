// Copyright (c) 2025 - Cowboy AI, Inc.
//! Field Path Value Object
//!
//! A field path addresses a nested value inside a thing's JSON documents
//! (attributes, feature properties, metadata). Paths are slash-separated
//! segment lists; the empty path addresses the document root.
//!
//! # Examples
//!
//! ```rust
//! use twin_reducer::domain::FieldPath;
//!
//! let path = FieldPath::parse("attributes/location/latitude").unwrap();
//! assert_eq!(path.segments().len(), 3);
//!
//! let root = FieldPath::root();
//! assert!(root.is_root());
//!
//! // Empty segments are rejected
//! assert!(FieldPath::parse("attributes//latitude").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Field path validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    /// A slash-separated segment was empty (`a//b`, trailing `/`)
    #[error("empty segment in field path: {0}")]
    EmptySegment(String),
}

/// Slash-separated path into a thing's JSON documents.
///
/// # Invariants
/// - No segment is empty
/// - The empty path (zero segments) is the document root
///
/// A single leading slash is tolerated on parse (`/attributes/color` and
/// `attributes/color` address the same value); `Display` always renders
/// the canonical form without it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path, addressing the whole document.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a slash-separated path with validation.
    pub fn parse(path: impl AsRef<str>) -> Result<Self, FieldPathError> {
        let raw = path.as_ref();
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);

        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() {
                return Err(FieldPathError::EmptySegment(raw.to_string()));
            }
            segments.push(segment.to_string());
        }

        Ok(Self(segments))
    }

    /// Build a path from pre-validated segments.
    ///
    /// Empty segments are filtered out rather than rejected; use
    /// [`parse`](Self::parse) at trust boundaries.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Path segments in order, empty for the root path.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the empty (root) path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the path has no segments (alias of [`is_root`](Self::is_root)).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend this path by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Concatenate two paths.
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// First segment plus the remaining path, `None` for the root.
    pub fn split_first(&self) -> Option<(&str, FieldPath)> {
        self.0
            .split_first()
            .map(|(head, rest)| (head.as_str(), FieldPath(rest.to_vec())))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
