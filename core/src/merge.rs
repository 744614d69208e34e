//! Deep merge of configuration maps.
//!
//! Precedence rules, all of them:
//! - a key present on one side only is copied through;
//! - a key present on both sides where both values are objects is merged
//!   recursively under these same rules;
//! - any other shared key takes the override's value whole. Arrays are not
//!   merged element-wise, and `null` in the override replaces the base value.
//!
//! Neither input is modified.

use serde_json::{Map, Value};

/// Merges `overrides` on top of `base` and returns a new map.
pub fn merge(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    merge_into(&mut merged, overrides);
    merged
}

fn merge_into(target: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (target.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
