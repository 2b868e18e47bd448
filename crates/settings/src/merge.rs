//! Recursive document merge.

use serde_json::Value;

/// Deep-merges `overlay` into `base` and returns the result.
///
/// Keys whose value is an object on both sides merge recursively; every
/// other value in `overlay` overwrites. Keys only present in `base` are
/// kept, so merging an empty object is the identity.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}
