// Copyright (c) 2025 - Cowboy AI, Inc.
//! JSON Document Utilities
//!
//! Path-addressed access into JSON objects plus the RFC 7396 merge-patch
//! applicator used by merged events. Merge-patch semantics:
//!
//! - a `null` patch value removes the key from the result
//! - object merges object recursively
//! - anything else replaces the existing value wholesale
//! - keys present only in the target are preserved
//!
//! [`merge_patch`] scopes the patch at an arbitrary field path by nesting
//! the patch value under that path before merging, so a caller can patch
//! `features/lamp/properties` without restating the rest of the document.

use serde_json::Value;

use crate::domain::{FieldPath, JsonObject};

/// Apply `patch` to `target` at `base_path` (RFC 7396, path-scoped).
pub fn merge_patch(base_path: &FieldPath, patch: &Value, target: &Value) -> Value {
    let nested = nest_under(base_path, patch.clone());
    merge(&nested, target)
}

/// Wrap a value in objects so it sits at `path` of the result.
fn nest_under(path: &FieldPath, value: Value) -> Value {
    path.segments().iter().rev().fold(value, |inner, segment| {
        let mut wrapper = JsonObject::new();
        wrapper.insert(segment.clone(), inner);
        Value::Object(wrapper)
    })
}

/// Recursive RFC 7396 merge of `patch` into `target`.
fn merge(patch: &Value, target: &Value) -> Value {
    match (patch, target) {
        (Value::Object(patch_map), Value::Object(target_map)) => {
            let mut result = target_map.clone();
            for (key, patch_value) in patch_map {
                match patch_value {
                    Value::Null => {
                        result.remove(key);
                    }
                    _ => {
                        let merged = match result.get(key) {
                            Some(existing) => merge(patch_value, existing),
                            None => merge(patch_value, &Value::Object(JsonObject::new())),
                        };
                        result.insert(key.clone(), merged);
                    }
                }
            }
            Value::Object(result)
        }
        // A non-object target is replaced by an object patch with its
        // nulls stripped (merge into an empty document), and any target
        // by a scalar/array patch.
        (Value::Object(_), _) => merge(patch, &Value::Object(JsonObject::new())),
        (replacement, _) => replacement.clone(),
    }
}

/// Set `value` at `path` inside `object`, creating intermediate objects.
///
/// A non-object value found on the way is replaced by an object. The root
/// path replaces the whole document when `value` is itself an object and
/// is otherwise ignored (a document is always an object).
pub fn set_at(object: &mut JsonObject, path: &FieldPath, value: Value) {
    fn set(object: &mut JsonObject, segments: &[String], value: Value) {
        match segments {
            [] => {
                if let Value::Object(map) = value {
                    *object = map;
                }
            }
            [last] => {
                object.insert(last.clone(), value);
            }
            [head, rest @ ..] => {
                let child = object.entry(head.clone()).or_insert(Value::Null);
                if let Value::Object(map) = child {
                    set(map, rest, value);
                } else {
                    let mut map = JsonObject::new();
                    set(&mut map, rest, value);
                    *child = Value::Object(map);
                }
            }
        }
    }

    set(object, path.segments(), value);
}

/// Remove the value at `path` from `object`.
///
/// Removing a missing path is a no-op; the root path clears the document.
pub fn remove_at(object: &mut JsonObject, path: &FieldPath) {
    fn remove(object: &mut JsonObject, segments: &[String]) {
        match segments {
            [] => object.clear(),
            [last] => {
                object.remove(last);
            }
            [head, rest @ ..] => {
                if let Some(Value::Object(child)) = object.get_mut(head) {
                    remove(child, rest);
                }
            }
        }
    }

    remove(object, path.segments());
}
