// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Thing Reducer
//!
//! Verifies the reducer's contract over arbitrary journals:
//! - Determinism: same journal, same snapshot, byte for byte
//! - Composition: folding a journal in chunks equals folding it whole
//! - Unknown tags change bookkeeping only
//! - Deleting a field twice equals deleting it once

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};

use twin_reducer::domain::{FieldPath, PolicyId, Thing, ThingId};
use twin_reducer::events::{ThingEvent, ThingEventKind};
use twin_reducer::reducer::{apply, replay};

fn fixed_timestamp() -> DateTime<Utc> {
    "2026-01-19T12:00:00Z".parse().unwrap()
}

fn path(s: &str) -> FieldPath {
    FieldPath::parse(s).unwrap()
}

/// Scalar payloads; no nulls, so merge events never mean "delete" here
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{1,8}".prop_map(|s| json!(s)),
    ]
}

/// Attribute paths from a small alphabet so journals collide on purpose
fn attribute_path() -> impl Strategy<Value = FieldPath> {
    prop::collection::vec(
        prop_oneof![
            Just("color".to_string()),
            Just("size".to_string()),
            Just("location".to_string()),
            Just("lat".to_string()),
            Just("lon".to_string()),
        ],
        1..3,
    )
    .prop_map(FieldPath::from_segments)
}

/// Any non-creation event the generator knows how to build
fn mutation_event() -> impl Strategy<Value = ThingEvent> {
    prop_oneof![
        (attribute_path(), scalar()).prop_map(|(path, value)| {
            ThingEvent::new(ThingEventKind::AttributeModified { path, value })
        }),
        (attribute_path(), scalar()).prop_map(|(path, value)| {
            ThingEvent::new(ThingEventKind::AttributeCreated { path, value })
        }),
        attribute_path()
            .prop_map(|path| ThingEvent::new(ThingEventKind::AttributeDeleted { path })),
        (attribute_path(), prop_oneof![scalar(), Just(Value::Null)]).prop_map(|(rel, value)| {
            ThingEvent::new(ThingEventKind::ThingMerged {
                path: path("attributes").join(&rel),
                value,
            })
        }),
        "[a-z]{1,8}".prop_map(|name| {
            ThingEvent::new(ThingEventKind::PolicyIdModified {
                policy_id: PolicyId::new(format!("org.example:{name}")),
            })
        }),
        (Just("lamp".to_string()), attribute_path(), scalar()).prop_map(
            |(feature_id, path, value)| {
                ThingEvent::new(ThingEventKind::FeaturePropertyModified {
                    feature_id,
                    path,
                    value,
                })
            }
        ),
        Just(ThingEvent::new(ThingEventKind::ThingDeleted)),
        "[a-z]{4,12}".prop_map(|tag| ThingEvent::new(ThingEventKind::Unknown { tag })),
    ]
}

/// A journal that starts with a creation, with events timestamped or not
fn journal() -> impl Strategy<Value = Vec<ThingEvent>> {
    prop::collection::vec((mutation_event(), any::<bool>()), 0..20).prop_map(|events| {
        let created = ThingEvent::new(ThingEventKind::ThingCreated {
            thing: Thing::new(ThingId::new("org.example:prop-thing")),
        })
        .with_timestamp(fixed_timestamp());

        std::iter::once(created)
            .chain(events.into_iter().map(|(event, stamped)| {
                if stamped {
                    event.with_timestamp(fixed_timestamp())
                } else {
                    event
                }
            }))
            .collect()
    })
}

/// Continue a fold from an existing snapshot with ascending revisions
fn fold_from(
    mut snapshot: Option<Thing>,
    start_revision: u64,
    events: &[ThingEvent],
) -> Option<Thing> {
    for (offset, event) in events.iter().enumerate() {
        snapshot = apply(snapshot.as_ref(), event, start_revision + offset as u64)
            .expect("generated journals never contain malformed documents");
    }
    snapshot
}

proptest! {
    /// Same journal, same snapshot, byte for byte.
    #[test]
    fn prop_replay_is_deterministic(events in journal()) {
        let first = replay(&events).unwrap();
        let second = replay(&events).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    /// apply is a pure function of (prior, event, revision).
    #[test]
    fn prop_apply_is_pure(events in journal(), event in mutation_event()) {
        let prior = replay(&events).unwrap();

        let first = apply(prior.as_ref(), &event, 99).unwrap();
        let second = apply(prior.as_ref(), &event, 99).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Folding a journal in two chunks equals folding it whole.
    #[test]
    fn prop_fold_composes(events in journal(), split in 0usize..21) {
        let split = split.min(events.len());
        let (head, tail) = events.split_at(split);

        let whole = replay(&events).unwrap();

        let head_state = fold_from(None, 1, head);
        let chunked = fold_from(head_state, split as u64 + 1, tail);

        prop_assert_eq!(whole, chunked);
    }

    /// The snapshot's revision is always the journal length.
    #[test]
    fn prop_revision_counts_events(events in journal()) {
        let snapshot = replay(&events).unwrap().unwrap();
        prop_assert_eq!(snapshot.revision, events.len() as u64);
    }

    /// Unknown tags never touch domain state.
    #[test]
    fn prop_unknown_tag_is_domain_noop(events in journal(), tag in "[a-z]{4,12}") {
        let prior = replay(&events).unwrap().unwrap();

        let event = ThingEvent::new(ThingEventKind::Unknown { tag });
        let next = apply(Some(&prior), &event, prior.revision + 1).unwrap().unwrap();

        prop_assert_eq!(&next.id, &prior.id);
        prop_assert_eq!(next.lifecycle, prior.lifecycle);
        prop_assert_eq!(&next.policy_id, &prior.policy_id);
        prop_assert_eq!(&next.definition, &prior.definition);
        prop_assert_eq!(&next.attributes, &prior.attributes);
        prop_assert_eq!(&next.features, &prior.features);
        prop_assert_eq!(&next.metadata, &prior.metadata);
    }

    /// Deleting an attribute twice equals deleting it once.
    #[test]
    fn prop_attribute_delete_is_idempotent(events in journal(), target in attribute_path()) {
        let prior = replay(&events).unwrap().unwrap();

        let delete = ThingEvent::new(ThingEventKind::AttributeDeleted { path: target });

        let once = apply(Some(&prior), &delete, prior.revision + 1).unwrap().unwrap();
        let twice = apply(Some(&once), &delete, prior.revision + 1).unwrap().unwrap();

        prop_assert_eq!(once, twice);
    }

    /// Non-creation events cannot reconstruct from nothing.
    #[test]
    fn prop_no_reconstruction_from_nothing(event in mutation_event()) {
        prop_assert!(apply(None, &event, 1).unwrap().is_none());
    }
}
