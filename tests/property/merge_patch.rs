// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Merge-Patch Applicator
//!
//! RFC 7396 laws over arbitrary JSON documents: null removal, sibling
//! preservation, idempotence, and path scoping.

use proptest::prelude::*;
use serde_json::{json, Value};

use twin_reducer::domain::FieldPath;
use twin_reducer::json_merge::merge_patch;

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(|s| json!(s)),
    ]
}

/// Arbitrary JSON up to a small depth
fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Arbitrary JSON objects
fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,4}", json_value(), 0..5)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

/// Short scoping paths
fn scope_path() -> impl Strategy<Value = FieldPath> {
    prop::collection::vec("[a-z]{1,4}", 0..3).prop_map(FieldPath::from_segments)
}

proptest! {
    /// A null patch value removes the key; all sibling keys survive.
    #[test]
    fn prop_null_removes_key(target in json_object(), key in "[a-z]{1,4}") {
        let mut patch_map = serde_json::Map::new();
        patch_map.insert(key.clone(), Value::Null);
        let patch = Value::Object(patch_map);

        let result = merge_patch(&FieldPath::root(), &patch, &target);

        let result_map = result.as_object().unwrap();
        prop_assert!(result_map.get(&key).is_none());

        for (name, value) in target.as_object().unwrap() {
            if *name != key {
                prop_assert_eq!(result_map.get(name), Some(value));
            }
        }
    }

    /// Applying the same patch twice equals applying it once.
    #[test]
    fn prop_merge_patch_is_idempotent(
        target in json_value(),
        patch in json_value(),
        path in scope_path()
    ) {
        let once = merge_patch(&path, &patch, &target);
        let twice = merge_patch(&path, &patch, &once);
        prop_assert_eq!(once, twice);
    }

    /// An empty object patch is the identity on object targets.
    #[test]
    fn prop_empty_patch_is_identity(target in json_object()) {
        let result = merge_patch(&FieldPath::root(), &json!({}), &target);
        prop_assert_eq!(result, target);
    }

    /// A non-null patch at a scoped path lands exactly there.
    #[test]
    fn prop_scoped_patch_lands_at_path(
        target in json_object(),
        path in scope_path(),
        replacement in "[a-z]{1,8}"
    ) {
        prop_assume!(!path.is_root());

        let patch = json!(replacement);
        let result = merge_patch(&path, &patch, &target);

        // Walk the result down the path; every step must exist
        let mut cursor = &result;
        for segment in path.segments() {
            cursor = cursor.get(segment).expect("scoped patch must create its path");
        }
        prop_assert_eq!(cursor, &patch);
    }

    /// Determinism: merging the same inputs yields identical bytes.
    #[test]
    fn prop_merge_patch_is_deterministic(
        target in json_value(),
        patch in json_value(),
        path in scope_path()
    ) {
        let first = merge_patch(&path, &patch, &target);
        let second = merge_patch(&path, &patch, &target);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_null_patch_at_root_keeps_document_shape() {
        // Nesting null under a path removes the leaf, never the spine
        let target = json!({ "a": { "b": 1, "c": 2 } });
        let result = merge_patch(
            &FieldPath::parse("a/b").unwrap(),
            &Value::Null,
            &target,
        );
        assert_eq!(result, json!({ "a": { "c": 2 } }));
    }
}
