// Copyright (c) 2025 - Cowboy AI, Inc.
//! Thing Aggregate Snapshot
//!
//! The immutable state of one digital-twin thing, reconstructed by folding
//! its event journal. All fields are public for read access; new snapshots
//! are produced by the reducer's transition functions, never by in-place
//! mutation outside a single reduction step.
//!
//! # Reconstruction
//!
//! ```rust,ignore
//! let thing = twin_reducer::reducer::replay(&events)?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::metadata::MetadataTree;

/// JSON object document (attributes, feature properties).
///
/// `serde_json`'s map is ordered by key in the default build, which keeps
/// snapshot serialization deterministic.
pub type JsonObject = Map<String, Value>;

/// Opaque thing identifier in `namespace:name` form.
///
/// Identifier syntax is validated by the surrounding entity-ID layer
/// before events reach this engine; the newtype only exposes the
/// conventional split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(String);

impl ThingId {
    /// Wrap an already-validated identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first `:`, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once(':').map(|(ns, _)| ns)
    }

    /// The part after the first `:`, or the whole identifier.
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThingId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to the policy governing a thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Wrap an already-validated policy identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PolicyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Thing lifecycle flag.
///
/// A deleted thing stays addressable (the surrounding layer reads it as
/// "not found") and can only come back through a created-class event,
/// which replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Thing exists and is readable
    Active,

    /// Thing was deleted; only a created event may resurrect it
    Deleted,
}

impl Lifecycle {
    /// Whether the lifecycle flag reads as deleted.
    pub fn is_deleted(self) -> bool {
        matches!(self, Lifecycle::Deleted)
    }
}

/// A named sub-entity of a thing.
///
/// Features carry an optional definition (list of model identifiers) and
/// an optional free-form properties document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    /// Model identifiers this feature conforms to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<String>>,

    /// Free-form property document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<JsonObject>,
}

impl Feature {
    /// JSON representation of this feature.
    pub fn to_json(&self) -> Value {
        let mut doc = JsonObject::new();
        if let Some(definition) = &self.definition {
            doc.insert(
                "definition".to_string(),
                Value::Array(definition.iter().map(|d| Value::String(d.clone())).collect()),
            );
        }
        if let Some(properties) = &self.properties {
            doc.insert("properties".to_string(), Value::Object(properties.clone()));
        }
        Value::Object(doc)
    }
}

/// The feature collection of a thing, keyed by feature id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(BTreeMap<String, Feature>);

impl Features {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up a feature by id.
    pub fn get(&self, feature_id: &str) -> Option<&Feature> {
        self.0.get(feature_id)
    }

    /// Mutable lookup of a feature by id.
    pub fn get_mut(&mut self, feature_id: &str) -> Option<&mut Feature> {
        self.0.get_mut(feature_id)
    }

    /// Insert or replace a feature.
    pub fn insert(&mut self, feature_id: impl Into<String>, feature: Feature) {
        self.0.insert(feature_id.into(), feature);
    }

    /// Remove a feature; removing a missing id is a no-op.
    pub fn remove(&mut self, feature_id: &str) {
        self.0.remove(feature_id);
    }

    /// Mutable access to a feature, inserting an empty one when absent.
    ///
    /// Replayed journals may reference a feature before its own created
    /// event survives compaction, so sub-feature transitions materialize
    /// the feature on demand.
    pub fn entry(&mut self, feature_id: impl Into<String>) -> &mut Feature {
        self.0.entry(feature_id.into()).or_default()
    }

    /// Iterate features in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Feature)> {
        self.0.iter()
    }

    /// JSON representation of the collection.
    pub fn to_json(&self) -> Value {
        let mut doc = JsonObject::new();
        for (feature_id, feature) in &self.0 {
            doc.insert(feature_id.clone(), feature.to_json());
        }
        Value::Object(doc)
    }
}

impl FromIterator<(String, Feature)> for Features {
    fn from_iter<I: IntoIterator<Item = (String, Feature)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Immutable thing snapshot.
///
/// # Invariants
/// - `revision` only increases across a journal (enforced by the caller,
///   which owns the revision counter)
/// - `lifecycle == Deleted` implies the domain content sections are cleared
/// - identical journals reconstruct byte-identical snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    /// Thing identifier
    #[serde(rename = "thingId")]
    pub id: ThingId,

    /// Active or deleted
    pub lifecycle: Lifecycle,

    /// How many events have been applied to this thing
    pub revision: u64,

    /// Timestamp of the latest applied event carrying one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    /// Per-field provenance
    #[serde(default, skip_serializing_if = "MetadataTree::is_empty")]
    pub metadata: MetadataTree,

    /// Governing policy reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<PolicyId>,

    /// Model/ontology reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Free-form attribute document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsonObject>,

    /// Named sub-entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
}

impl Thing {
    /// Create an empty active thing at revision zero.
    pub fn new(id: ThingId) -> Self {
        Self {
            id,
            lifecycle: Lifecycle::Active,
            revision: 0,
            modified: None,
            metadata: MetadataTree::new(),
            policy_id: None,
            definition: None,
            attributes: None,
            features: None,
        }
    }

    /// Domain document view: `thingId`, `policyId`, `definition`,
    /// `attributes`, `features`.
    ///
    /// This is the JSON the merged-event transition patches; bookkeeping
    /// fields (lifecycle, revision, modified, metadata) are not part of
    /// the patchable document.
    pub fn to_json(&self) -> Value {
        let mut doc = JsonObject::new();
        doc.insert("thingId".to_string(), Value::String(self.id.as_str().to_string()));
        if let Some(policy_id) = &self.policy_id {
            doc.insert("policyId".to_string(), Value::String(policy_id.as_str().to_string()));
        }
        if let Some(definition) = &self.definition {
            doc.insert("definition".to_string(), Value::String(definition.clone()));
        }
        if let Some(attributes) = &self.attributes {
            doc.insert("attributes".to_string(), Value::Object(attributes.clone()));
        }
        if let Some(features) = &self.features {
            doc.insert("features".to_string(), features.to_json());
        }
        Value::Object(doc)
    }
}
