// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for twin-reducer
//!
//! Deterministic test data for reducer and serialization tests. All
//! timestamps and identifiers are fixed constants so tests are
//! reproducible; fixtures never read the clock.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::json;

use twin_reducer::domain::{Feature, Features, FieldPath, JsonObject, PolicyId, Thing, ThingId};
use twin_reducer::events::{EventHeaders, ThingEvent, ThingEventKind};

pub const THING_ID: &str = "org.example:bulb-1";
pub const POLICY_ID: &str = "org.example:bulb-policy";
pub const CORRELATION_ID: &str = "req-0001";

// Fixed test timestamps
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";
pub const LATER_TIMESTAMP: &str = "2026-01-19T12:05:00Z";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    FIXED_TIMESTAMP.parse().expect("Invalid timestamp in test fixture")
}

/// Parse the later timestamp
pub fn later_timestamp() -> DateTime<Utc> {
    LATER_TIMESTAMP.parse().expect("Invalid timestamp in test fixture")
}

/// Parse a field path, panicking on fixture typos
pub fn field_path(path: &str) -> FieldPath {
    FieldPath::parse(path).expect("Invalid field path in test fixture")
}

/// A thing with one attribute document and one feature
pub fn bulb_thing() -> Thing {
    let mut attributes = JsonObject::new();
    attributes.insert("color".to_string(), json!("red"));
    attributes.insert("location".to_string(), json!({ "lat": 52.5, "lon": 13.4 }));

    let mut properties = JsonObject::new();
    properties.insert("on".to_string(), json!(false));
    properties.insert("brightness".to_string(), json!(80));

    let mut features = Features::new();
    features.insert(
        "lamp",
        Feature {
            definition: Some(vec!["org.example:lamp:1.0.0".to_string()]),
            properties: Some(properties),
        },
    );

    Thing {
        policy_id: Some(PolicyId::new(POLICY_ID)),
        definition: Some("org.example:bulb:2.0.0".to_string()),
        attributes: Some(attributes),
        features: Some(features),
        ..Thing::new(ThingId::new(THING_ID))
    }
}

/// ThingCreated carrying [`bulb_thing`], stamped with the fixed timestamp
pub fn thing_created_event() -> ThingEvent {
    ThingEvent::new(ThingEventKind::ThingCreated { thing: bulb_thing() })
        .with_timestamp(fixed_timestamp())
        .with_headers(EventHeaders::new().with("correlation-id", CORRELATION_ID))
}

/// AttributeModified at `attributes/color`, stamped with the later timestamp
pub fn attribute_modified_event() -> ThingEvent {
    ThingEvent::new(ThingEventKind::AttributeModified {
        path: field_path("color"),
        value: json!("blue"),
    })
    .with_timestamp(later_timestamp())
}

/// ThingMerged patching the lamp feature's properties
pub fn thing_merged_event() -> ThingEvent {
    ThingEvent::new(ThingEventKind::ThingMerged {
        path: field_path("features/lamp/properties"),
        value: json!({ "on": true, "brightness": null }),
    })
    .with_timestamp(later_timestamp())
}

/// An event tag this version has never heard of
pub fn unknown_event() -> ThingEvent {
    ThingEvent::new(ThingEventKind::Unknown {
        tag: "thingSharded".to_string(),
    })
    .with_timestamp(later_timestamp())
}
