// Copyright (c) 2025 - Cowboy AI, Inc.
//! Thing Domain Events
//!
//! All state changes to a thing are represented as immutable events.
//! Events follow event sourcing practice:
//! - Immutable facts, named in past tense (AttributeModified, not ModifyAttribute)
//! - Tagged by type for journal storage (adjacent `"type"` discriminant)
//! - Carry an optional timestamp and a header map for cross-cutting context
//!
//! # Forward Compatibility
//!
//! The event sum is closed, so the reducer's dispatch is exhaustive and
//! compiler-checked. Journals written by newer software may still contain
//! tags this version has never heard of; those deserialize into
//! [`ThingEventKind::Unknown`] instead of failing, and the reducer applies
//! bookkeeping only. A malformed payload under a *known* tag stays an
//! error: degrading it to `Unknown` would silently corrupt replayed state.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Feature, Features, FieldPath, JsonObject, PolicyId, Thing};

use super::headers::EventHeaders;

/// Closed sum of thing event variants.
///
/// Created/Modified pairs are distinct journal facts even where their
/// state effect is identical; the reducer routes them to shared
/// transition functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ThingEventKind {
    /// Thing was created from the embedded full representation
    ThingCreated { thing: Thing },

    /// First-level sections present in the embedded thing were replaced
    ThingModified { thing: Thing },

    /// A merge patch was applied at `path` (RFC 7396, null deletes)
    ThingMerged { path: FieldPath, value: Value },

    /// Thing was deleted; identifier and revision survive
    ThingDeleted,

    /// Governing policy reference changed
    #[serde(rename_all = "camelCase")]
    PolicyIdModified { policy_id: PolicyId },

    /// Thing definition was set
    ThingDefinitionCreated { definition: String },

    /// Thing definition was replaced
    ThingDefinitionModified { definition: String },

    /// Thing definition was removed
    ThingDefinitionDeleted,

    /// Whole attribute document was set
    AttributesCreated { attributes: JsonObject },

    /// Whole attribute document was replaced
    AttributesModified { attributes: JsonObject },

    /// Whole attribute document was removed
    AttributesDeleted,

    /// Single attribute was set at `path` (relative to `attributes`)
    AttributeCreated { path: FieldPath, value: Value },

    /// Single attribute was replaced at `path`
    AttributeModified { path: FieldPath, value: Value },

    /// Single attribute was removed at `path`
    AttributeDeleted { path: FieldPath },

    /// Whole feature collection was set
    FeaturesCreated { features: Features },

    /// Whole feature collection was replaced
    FeaturesModified { features: Features },

    /// Whole feature collection was removed
    FeaturesDeleted,

    /// Single feature was set
    #[serde(rename_all = "camelCase")]
    FeatureCreated { feature_id: String, feature: Feature },

    /// Single feature was replaced
    #[serde(rename_all = "camelCase")]
    FeatureModified { feature_id: String, feature: Feature },

    /// Single feature was removed
    #[serde(rename_all = "camelCase")]
    FeatureDeleted { feature_id: String },

    /// Feature definition was set
    #[serde(rename_all = "camelCase")]
    FeatureDefinitionCreated { feature_id: String, definition: Vec<String> },

    /// Feature definition was replaced
    #[serde(rename_all = "camelCase")]
    FeatureDefinitionModified { feature_id: String, definition: Vec<String> },

    /// Feature definition was removed
    #[serde(rename_all = "camelCase")]
    FeatureDefinitionDeleted { feature_id: String },

    /// Feature property document was set
    #[serde(rename_all = "camelCase")]
    FeaturePropertiesCreated { feature_id: String, properties: JsonObject },

    /// Feature property document was replaced
    #[serde(rename_all = "camelCase")]
    FeaturePropertiesModified { feature_id: String, properties: JsonObject },

    /// Feature property document was removed
    #[serde(rename_all = "camelCase")]
    FeaturePropertiesDeleted { feature_id: String },

    /// Single feature property was set at `path` (relative to the
    /// feature's `properties`)
    #[serde(rename_all = "camelCase")]
    FeaturePropertyCreated { feature_id: String, path: FieldPath, value: Value },

    /// Single feature property was replaced at `path`
    #[serde(rename_all = "camelCase")]
    FeaturePropertyModified { feature_id: String, path: FieldPath, value: Value },

    /// Single feature property was removed at `path`
    #[serde(rename_all = "camelCase")]
    FeaturePropertyDeleted { feature_id: String, path: FieldPath },

    /// Fallback for event tags introduced by newer writers; `tag`
    /// preserves the unrecognized discriminant for diagnostics
    Unknown { tag: String },
}

/// Every tag this version knows how to deserialize.
///
/// [`ThingEvent`]'s deserializer consults this list: a missing tag means
/// "newer writer" and degrades to [`ThingEventKind::Unknown`]; a present
/// tag with a malformed payload stays an error.
pub const KNOWN_EVENT_TAGS: &[&str] = &[
    "thingCreated",
    "thingModified",
    "thingMerged",
    "thingDeleted",
    "policyIdModified",
    "thingDefinitionCreated",
    "thingDefinitionModified",
    "thingDefinitionDeleted",
    "attributesCreated",
    "attributesModified",
    "attributesDeleted",
    "attributeCreated",
    "attributeModified",
    "attributeDeleted",
    "featuresCreated",
    "featuresModified",
    "featuresDeleted",
    "featureCreated",
    "featureModified",
    "featureDeleted",
    "featureDefinitionCreated",
    "featureDefinitionModified",
    "featureDefinitionDeleted",
    "featurePropertiesCreated",
    "featurePropertiesModified",
    "featurePropertiesDeleted",
    "featurePropertyCreated",
    "featurePropertyModified",
    "featurePropertyDeleted",
    "unknown",
];

impl ThingEventKind {
    /// The journal tag of this variant.
    ///
    /// For [`Unknown`](Self::Unknown) this is the preserved foreign tag,
    /// not the literal `"unknown"`.
    pub fn tag(&self) -> &str {
        use ThingEventKind::*;

        match self {
            ThingCreated { .. } => "thingCreated",
            ThingModified { .. } => "thingModified",
            ThingMerged { .. } => "thingMerged",
            ThingDeleted => "thingDeleted",
            PolicyIdModified { .. } => "policyIdModified",
            ThingDefinitionCreated { .. } => "thingDefinitionCreated",
            ThingDefinitionModified { .. } => "thingDefinitionModified",
            ThingDefinitionDeleted => "thingDefinitionDeleted",
            AttributesCreated { .. } => "attributesCreated",
            AttributesModified { .. } => "attributesModified",
            AttributesDeleted => "attributesDeleted",
            AttributeCreated { .. } => "attributeCreated",
            AttributeModified { .. } => "attributeModified",
            AttributeDeleted { .. } => "attributeDeleted",
            FeaturesCreated { .. } => "featuresCreated",
            FeaturesModified { .. } => "featuresModified",
            FeaturesDeleted => "featuresDeleted",
            FeatureCreated { .. } => "featureCreated",
            FeatureModified { .. } => "featureModified",
            FeatureDeleted { .. } => "featureDeleted",
            FeatureDefinitionCreated { .. } => "featureDefinitionCreated",
            FeatureDefinitionModified { .. } => "featureDefinitionModified",
            FeatureDefinitionDeleted { .. } => "featureDefinitionDeleted",
            FeaturePropertiesCreated { .. } => "featurePropertiesCreated",
            FeaturePropertiesModified { .. } => "featurePropertiesModified",
            FeaturePropertiesDeleted { .. } => "featurePropertiesDeleted",
            FeaturePropertyCreated { .. } => "featurePropertyCreated",
            FeaturePropertyModified { .. } => "featurePropertyModified",
            FeaturePropertyDeleted { .. } => "featurePropertyDeleted",
            Unknown { tag } => tag,
        }
    }

    /// Whether this version can deserialize the given tag.
    pub fn is_known_tag(tag: &str) -> bool {
        KNOWN_EVENT_TAGS.contains(&tag)
    }

    /// Whether this is a created-class event (the only class that can
    /// reconstruct a thing from an absent prior snapshot).
    pub fn is_creation(&self) -> bool {
        matches!(self, ThingEventKind::ThingCreated { .. })
    }
}

/// Immutable thing event: variant plus timestamp and headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThingEvent {
    /// The event variant and its payload
    #[serde(flatten)]
    pub kind: ThingEventKind,

    /// When the change occurred, if the writer recorded it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Cross-cutting context; `ditto-metadata:` keys feed metadata derivation
    #[serde(default, skip_serializing_if = "EventHeaders::is_empty")]
    pub headers: EventHeaders,
}

impl ThingEvent {
    /// Create an event with no timestamp and empty headers.
    pub fn new(kind: ThingEventKind) -> Self {
        Self {
            kind,
            timestamp: None,
            headers: EventHeaders::new(),
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach headers.
    pub fn with_headers(mut self, headers: EventHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// The journal tag of this event.
    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    /// The field path this event addresses within the thing document;
    /// empty for whole-thing events.
    pub fn resource_path(&self) -> FieldPath {
        use ThingEventKind::*;

        match &self.kind {
            ThingCreated { .. } | ThingModified { .. } | ThingDeleted | Unknown { .. } => {
                FieldPath::root()
            }
            ThingMerged { path, .. } => path.clone(),
            PolicyIdModified { .. } => FieldPath::root().child("policyId"),
            ThingDefinitionCreated { .. }
            | ThingDefinitionModified { .. }
            | ThingDefinitionDeleted => FieldPath::root().child("definition"),
            AttributesCreated { .. } | AttributesModified { .. } | AttributesDeleted => {
                FieldPath::root().child("attributes")
            }
            AttributeCreated { path, .. }
            | AttributeModified { path, .. }
            | AttributeDeleted { path } => FieldPath::root().child("attributes").join(path),
            FeaturesCreated { .. } | FeaturesModified { .. } | FeaturesDeleted => {
                FieldPath::root().child("features")
            }
            FeatureCreated { feature_id, .. }
            | FeatureModified { feature_id, .. }
            | FeatureDeleted { feature_id } => FieldPath::root().child("features").child(feature_id),
            FeatureDefinitionCreated { feature_id, .. }
            | FeatureDefinitionModified { feature_id, .. }
            | FeatureDefinitionDeleted { feature_id } => FieldPath::root()
                .child("features")
                .child(feature_id)
                .child("definition"),
            FeaturePropertiesCreated { feature_id, .. }
            | FeaturePropertiesModified { feature_id, .. }
            | FeaturePropertiesDeleted { feature_id } => FieldPath::root()
                .child("features")
                .child(feature_id)
                .child("properties"),
            FeaturePropertyCreated { feature_id, path, .. }
            | FeaturePropertyModified { feature_id, path, .. }
            | FeaturePropertyDeleted { feature_id, path } => FieldPath::root()
                .child("features")
                .child(feature_id)
                .child("properties")
                .join(path),
        }
    }

    /// The written payload as JSON, `None` for deletions and unknown tags.
    ///
    /// Metadata derivation walks this value to stamp issued-at provenance
    /// onto every leaf the event touched.
    pub fn payload_value(&self) -> Option<Value> {
        use ThingEventKind::*;

        match &self.kind {
            ThingCreated { thing } | ThingModified { thing } => Some(thing.to_json()),
            ThingMerged { value, .. } => Some(value.clone()),
            PolicyIdModified { policy_id } => Some(Value::String(policy_id.as_str().to_string())),
            ThingDefinitionCreated { definition } | ThingDefinitionModified { definition } => {
                Some(Value::String(definition.clone()))
            }
            AttributesCreated { attributes } | AttributesModified { attributes } => {
                Some(Value::Object(attributes.clone()))
            }
            AttributeCreated { value, .. } | AttributeModified { value, .. } => Some(value.clone()),
            FeaturesCreated { features } | FeaturesModified { features } => Some(features.to_json()),
            FeatureCreated { feature, .. } | FeatureModified { feature, .. } => {
                Some(feature.to_json())
            }
            FeatureDefinitionCreated { definition, .. }
            | FeatureDefinitionModified { definition, .. } => Some(Value::Array(
                definition.iter().map(|d| Value::String(d.clone())).collect(),
            )),
            FeaturePropertiesCreated { properties, .. }
            | FeaturePropertiesModified { properties, .. } => Some(Value::Object(properties.clone())),
            FeaturePropertyCreated { value, .. } | FeaturePropertyModified { value, .. } => {
                Some(value.clone())
            }
            ThingDeleted
            | ThingDefinitionDeleted
            | AttributesDeleted
            | AttributeDeleted { .. }
            | FeaturesDeleted
            | FeatureDeleted { .. }
            | FeatureDefinitionDeleted { .. }
            | FeaturePropertiesDeleted { .. }
            | FeaturePropertyDeleted { .. }
            | Unknown { .. } => None,
        }
    }
}

// Deserialization is hand-written so that unrecognized tags degrade to
// `Unknown` instead of failing the whole journal read. Serialization uses
// the derived flatten form above.
impl<'de> Deserialize<'de> for ThingEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut doc = JsonObject::deserialize(deserializer)?;

        let timestamp = match doc.remove("timestamp") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value).map_err(D::Error::custom)?),
        };

        let headers = match doc.remove("headers") {
            None | Some(Value::Null) => EventHeaders::default(),
            Some(value) => serde_json::from_value(value).map_err(D::Error::custom)?,
        };

        let tag = doc
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?
            .to_string();

        let kind = if ThingEventKind::is_known_tag(&tag) {
            serde_json::from_value(Value::Object(doc)).map_err(D::Error::custom)?
        } else {
            ThingEventKind::Unknown { tag }
        };

        Ok(Self {
            kind,
            timestamp,
            headers,
        })
    }
}
