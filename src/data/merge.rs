//! Deep merge of [`DataMap`]s.
//!
//! Nested maps are merged key by key, the later operand winning on conflicts.
//! Every other kind of value, lists included, is replaced wholesale.

use super::value::{DataMap, Value};

/// Returns `base` overlaid with `overlay`. Neither input is modified.
pub fn deep_merge(base: &DataMap, overlay: &DataMap) -> DataMap {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay.clone());
    merged
}

/// Merges every entry of `overlay` into `target` using [`merge_value`].
pub fn merge_into(target: &mut DataMap, overlay: DataMap) {
    for (key, value) in overlay {
        merge_value(target, key, value);
    }
}

/// Merge-by-key rule: when both the existing and the incoming value are maps
/// they are merged recursively, otherwise the incoming value replaces
/// whatever was stored under `key`.
pub fn merge_value(target: &mut DataMap, key: String, incoming: Value) {
    if let Value::Map(incoming) = incoming {
        if let Some(Value::Map(existing)) = target.get_mut(&key) {
            merge_into(existing, incoming);
            return;
        }
        target.insert(key, Value::Map(incoming));
        return;
    }
    target.insert(key, incoming);
}
