//! Structural schema merging - combines a base schema with an overlay.
//!
//! Used for inheritance/composition before compilation. The merge is a pure,
//! total function: it never fails, and a non-object on either side
//! short-circuits to a clone of the other.

use serde_json::{Map, Value};

/// Merge an overlay schema into a base schema.
///
/// Per-key policy (overlay keys only; keys absent from the overlay leave the
/// base untouched):
///
/// | Key | Policy |
/// |-----|--------|
/// | `properties` | recursive merge, child by child |
/// | `items` | recursive merge when both sides carry it |
/// | `componentProps`, `decoratorProps` | deep-merged attribute bags |
/// | `reactions`, `rules` | concatenated, base entries first |
/// | everything else | overlay replaces base |
///
/// `null` values in the overlay are always skipped, so a base attribute
/// cannot be unset via merge; an overlay must supply an explicit neutral
/// value instead.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    let (Some(base_map), Some(overlay_map)) = (base.as_object(), overlay.as_object()) else {
        // One side is not a node: the other wins (overlay if both degenerate)
        if overlay.is_object() || base.is_null() {
            return overlay.clone();
        }
        return base.clone();
    };

    let mut result = base_map.clone();

    for (key, overlay_value) in overlay_map {
        if overlay_value.is_null() {
            continue;
        }

        match key.as_str() {
            "properties" => {
                let merged = merge_children(base_map.get(key), overlay_value);
                result.insert(key.clone(), merged);
            }
            "items" => {
                let merged = match base_map.get(key) {
                    Some(base_items) => merge(base_items, overlay_value),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            "componentProps" | "decoratorProps" => {
                let merged = match base_map.get(key) {
                    Some(base_props) => deep_merge(base_props, overlay_value),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            "reactions" | "rules" => {
                let merged = concat_lists(base_map.get(key), overlay_value);
                result.insert(key.clone(), merged);
            }
            _ => {
                result.insert(key.clone(), overlay_value.clone());
            }
        }
    }

    Value::Object(result)
}

/// Merge two `properties` maps: shared children merge recursively,
/// overlay-only children are taken as-is.
fn merge_children(base: Option<&Value>, overlay: &Value) -> Value {
    let Some(overlay_map) = overlay.as_object() else {
        return overlay.clone();
    };
    let Some(base_map) = base.and_then(|b| b.as_object()) else {
        return overlay.clone();
    };

    let mut result = base_map.clone();
    for (name, overlay_child) in overlay_map {
        match base_map.get(name) {
            Some(base_child) => {
                result.insert(name.clone(), merge(base_child, overlay_child));
            }
            None => {
                result.insert(name.clone(), overlay_child.clone());
            }
        }
    }
    Value::Object(result)
}

/// Deep-merge two plain attribute bags. Overlay values win at every nesting
/// level; non-conflicting keys from both sides survive.
fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result: Map<String, Value> = base_map.clone();
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    continue;
                }
                match base_map.get(key) {
                    Some(base_value) => {
                        result.insert(key.clone(), deep_merge(base_value, overlay_value));
                    }
                    None => {
                        result.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
            Value::Object(result)
        }
        _ => overlay.clone(),
    }
}

/// Concatenate two rule/reaction lists, base entries first.
/// Duplicates are intentionally possible; avoiding them is the caller's job.
fn concat_lists(base: Option<&Value>, overlay: &Value) -> Value {
    let mut result: Vec<Value> = base
        .and_then(|b| b.as_array())
        .map(|arr| arr.to_vec())
        .unwrap_or_default();
    match overlay.as_array() {
        Some(arr) => result.extend(arr.iter().cloned()),
        None => result.push(overlay.clone()),
    }
    Value::Array(result)
}
