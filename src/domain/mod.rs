// Copyright (c) 2025 - Cowboy AI, Inc.
//! Digital-Twin Domain Models
//!
//! Core value objects and the thing aggregate snapshot:
//!
//! - [`Thing`] - immutable aggregate snapshot reconstructed from events
//! - [`Feature`] / [`Features`] - named sub-entities of a thing
//! - [`FieldPath`] - validated slash-separated paths into JSON documents
//! - [`MetadataTree`] - per-field provenance (e.g. issued-at timestamps)
//! - [`ThingId`] / [`PolicyId`] - opaque identifier newtypes (identifier
//!   syntax is enforced by the surrounding entity-ID layer)

pub mod field_path;
pub mod metadata;
pub mod thing;

// Re-export value objects
pub use field_path::{FieldPath, FieldPathError};
pub use metadata::{MetadataNode, MetadataTree};
pub use thing::{Feature, Features, JsonObject, Lifecycle, PolicyId, Thing, ThingId};
