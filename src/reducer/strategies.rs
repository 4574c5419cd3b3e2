// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Transition Strategies
//!
//! One pure function per event class, routed by an exhaustive match over
//! the event sum. The compiler guarantees every variant has a handler;
//! the only runtime fallback left is the explicit [`ThingEventKind::Unknown`]
//! wire-compatibility arm, which applies no domain change and logs a
//! warning.
//!
//! # Invariants
//! - Transitions are pure: same staged thing + same event = same result
//! - Transitions never touch bookkeeping (revision, modified, metadata);
//!   the reducer stages those before dispatch and they survive every
//!   transition, including wholesale replacement by a created event
//! - Deletions of missing paths are no-ops, not errors

use serde_json::Value;
use tracing::warn;

use crate::domain::{Feature, Features, FieldPath, JsonObject, Lifecycle, PolicyId, Thing};
use crate::errors::{ApplyError, ApplyResult};
use crate::events::{ThingEvent, ThingEventKind};
use crate::json_merge;

/// Route an event to its transition function.
pub(crate) fn dispatch(event: &ThingEvent, staged: Thing) -> ApplyResult<Thing> {
    use ThingEventKind::*;

    match &event.kind {
        ThingCreated { thing } => Ok(create_thing(thing, staged)),
        ThingModified { thing } => Ok(modify_thing(thing, staged)),
        ThingMerged { path, value } => merge_thing(path, value, staged),
        ThingDeleted => Ok(delete_thing(staged)),

        PolicyIdModified { policy_id } => Ok(set_policy_id(policy_id, staged)),

        ThingDefinitionCreated { definition } | ThingDefinitionModified { definition } => {
            Ok(set_definition(definition, staged))
        }
        ThingDefinitionDeleted => Ok(delete_definition(staged)),

        AttributesCreated { attributes } | AttributesModified { attributes } => {
            Ok(set_attributes(attributes, staged))
        }
        AttributesDeleted => Ok(delete_attributes(staged)),

        AttributeCreated { path, value } | AttributeModified { path, value } => {
            Ok(set_attribute(path, value, staged))
        }
        AttributeDeleted { path } => Ok(delete_attribute(path, staged)),

        FeaturesCreated { features } | FeaturesModified { features } => {
            Ok(set_features(features, staged))
        }
        FeaturesDeleted => Ok(delete_features(staged)),

        FeatureCreated { feature_id, feature } | FeatureModified { feature_id, feature } => {
            Ok(set_feature(feature_id, feature, staged))
        }
        FeatureDeleted { feature_id } => Ok(delete_feature(feature_id, staged)),

        FeatureDefinitionCreated { feature_id, definition }
        | FeatureDefinitionModified { feature_id, definition } => {
            Ok(set_feature_definition(feature_id, definition, staged))
        }
        FeatureDefinitionDeleted { feature_id } => {
            Ok(delete_feature_definition(feature_id, staged))
        }

        FeaturePropertiesCreated { feature_id, properties }
        | FeaturePropertiesModified { feature_id, properties } => {
            Ok(set_feature_properties(feature_id, properties, staged))
        }
        FeaturePropertiesDeleted { feature_id } => {
            Ok(delete_feature_properties(feature_id, staged))
        }

        FeaturePropertyCreated { feature_id, path, value }
        | FeaturePropertyModified { feature_id, path, value } => {
            Ok(set_feature_property(feature_id, path, value, staged))
        }
        FeaturePropertyDeleted { feature_id, path } => {
            Ok(delete_feature_property(feature_id, path, staged))
        }

        Unknown { tag } => {
            warn!(tag = %tag, "no transition strategy for event tag, applying bookkeeping only");
            Ok(staged)
        }
    }
}

/// Replace the thing wholesale from the embedded representation.
///
/// Bookkeeping already staged by the reducer survives; the embedded
/// thing's own revision/modified values are journal noise at this point
/// (the caller's revision counter is authoritative).
fn create_thing(thing: &Thing, staged: Thing) -> Thing {
    Thing {
        id: thing.id.clone(),
        lifecycle: Lifecycle::Active,
        policy_id: thing.policy_id.clone(),
        definition: thing.definition.clone(),
        attributes: thing.attributes.clone(),
        features: thing.features.clone(),
        ..staged
    }
}

/// Shallow merge: overwrite only the first-level sections present in the
/// embedded thing; absent sections stay untouched.
fn modify_thing(thing: &Thing, mut staged: Thing) -> Thing {
    if thing.policy_id.is_some() {
        staged.policy_id = thing.policy_id.clone();
    }
    if thing.definition.is_some() {
        staged.definition = thing.definition.clone();
    }
    if thing.attributes.is_some() {
        staged.attributes = thing.attributes.clone();
    }
    if thing.features.is_some() {
        staged.features = thing.features.clone();
    }
    staged
}

/// Deep merge: RFC 7396 patch at the event path, then re-derive the typed
/// top-level sections from the merged document.
fn merge_thing(path: &FieldPath, value: &Value, staged: Thing) -> ApplyResult<Thing> {
    let merged = json_merge::merge_patch(path, value, &staged.to_json());

    let policy_id = match merged.get("policyId") {
        None => None,
        Some(value) => Some(
            value
                .as_str()
                .map(PolicyId::new)
                .ok_or_else(|| ApplyError::malformed("policyId", "expected a string"))?,
        ),
    };

    let definition = match merged.get("definition") {
        None => None,
        Some(value) => Some(
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ApplyError::malformed("definition", "expected a string"))?,
        ),
    };

    let attributes = match merged.get("attributes") {
        None => None,
        Some(value) => Some(
            value
                .as_object()
                .cloned()
                .ok_or_else(|| ApplyError::malformed("attributes", "expected an object"))?,
        ),
    };

    let features = match merged.get("features") {
        None => None,
        Some(value) => Some(
            serde_json::from_value::<Features>(value.clone())
                .map_err(|e| ApplyError::malformed("features", e.to_string()))?,
        ),
    };

    Ok(Thing {
        policy_id,
        definition,
        attributes,
        features,
        ..staged
    })
}

/// Tombstone: flip lifecycle and clear domain content. Identifier,
/// revision and provenance survive so the tombstone stays auditable.
fn delete_thing(staged: Thing) -> Thing {
    Thing {
        lifecycle: Lifecycle::Deleted,
        policy_id: None,
        definition: None,
        attributes: None,
        features: None,
        ..staged
    }
}

fn set_policy_id(policy_id: &PolicyId, staged: Thing) -> Thing {
    Thing {
        policy_id: Some(policy_id.clone()),
        ..staged
    }
}

fn set_definition(definition: &str, staged: Thing) -> Thing {
    Thing {
        definition: Some(definition.to_string()),
        ..staged
    }
}

fn delete_definition(staged: Thing) -> Thing {
    Thing {
        definition: None,
        ..staged
    }
}

fn set_attributes(attributes: &JsonObject, staged: Thing) -> Thing {
    Thing {
        attributes: Some(attributes.clone()),
        ..staged
    }
}

fn delete_attributes(staged: Thing) -> Thing {
    Thing {
        attributes: None,
        ..staged
    }
}

fn set_attribute(path: &FieldPath, value: &Value, mut staged: Thing) -> Thing {
    let mut attributes = staged.attributes.take().unwrap_or_default();
    json_merge::set_at(&mut attributes, path, value.clone());
    staged.attributes = Some(attributes);
    staged
}

fn delete_attribute(path: &FieldPath, mut staged: Thing) -> Thing {
    if let Some(attributes) = staged.attributes.as_mut() {
        json_merge::remove_at(attributes, path);
    }
    staged
}

fn set_features(features: &Features, staged: Thing) -> Thing {
    Thing {
        features: Some(features.clone()),
        ..staged
    }
}

fn delete_features(staged: Thing) -> Thing {
    Thing {
        features: None,
        ..staged
    }
}

fn set_feature(feature_id: &str, feature: &Feature, mut staged: Thing) -> Thing {
    let mut features = staged.features.take().unwrap_or_default();
    features.insert(feature_id, feature.clone());
    staged.features = Some(features);
    staged
}

fn delete_feature(feature_id: &str, mut staged: Thing) -> Thing {
    if let Some(features) = staged.features.as_mut() {
        features.remove(feature_id);
    }
    staged
}

fn set_feature_definition(feature_id: &str, definition: &[String], mut staged: Thing) -> Thing {
    let mut features = staged.features.take().unwrap_or_default();
    features.entry(feature_id).definition = Some(definition.to_vec());
    staged.features = Some(features);
    staged
}

fn delete_feature_definition(feature_id: &str, mut staged: Thing) -> Thing {
    if let Some(feature) = staged.features.as_mut().and_then(|f| f.get_mut(feature_id)) {
        feature.definition = None;
    }
    staged
}

fn set_feature_properties(feature_id: &str, properties: &JsonObject, mut staged: Thing) -> Thing {
    let mut features = staged.features.take().unwrap_or_default();
    features.entry(feature_id).properties = Some(properties.clone());
    staged.features = Some(features);
    staged
}

fn delete_feature_properties(feature_id: &str, mut staged: Thing) -> Thing {
    if let Some(feature) = staged.features.as_mut().and_then(|f| f.get_mut(feature_id)) {
        feature.properties = None;
    }
    staged
}

fn set_feature_property(
    feature_id: &str,
    path: &FieldPath,
    value: &Value,
    mut staged: Thing,
) -> Thing {
    let mut features = staged.features.take().unwrap_or_default();
    let feature = features.entry(feature_id);
    let mut properties = feature.properties.take().unwrap_or_default();
    json_merge::set_at(&mut properties, path, value.clone());
    feature.properties = Some(properties);
    staged.features = Some(features);
    staged
}

fn delete_feature_property(feature_id: &str, path: &FieldPath, mut staged: Thing) -> Thing {
    if let Some(feature) = staged.features.as_mut().and_then(|f| f.get_mut(feature_id)) {
        if let Some(properties) = feature.properties.as_mut() {
            json_merge::remove_at(properties, path);
        }
    }
    staged
}
