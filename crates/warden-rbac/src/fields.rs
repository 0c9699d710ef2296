//! Field-level record filtering.
//!
//! Redacts a record (or collection of records) down to an allowed field
//! set. Filtering is shallow: only top-level keys are considered, and
//! nested objects are carried through whole when their key is allowed.

use std::collections::BTreeSet;

use serde_json::Value;

/// Filters a JSON record (or array of records) to the allowed fields.
///
/// - An empty `allowed_fields` set means the field dimension is
///   unrestricted: the value is returned unchanged.
/// - Objects become shallow copies retaining only allowed keys; keys in
///   the allow-list but absent from the record are simply omitted, never
///   an error.
/// - Arrays are filtered element-wise, recursively.
/// - Scalars pass through unchanged.
pub fn filter_fields(value: &Value, allowed_fields: &BTreeSet<String>) -> Value {
    if allowed_fields.is_empty() {
        return value.clone();
    }

    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| allowed_fields.contains(key.as_str()))
                .map(|(key, field)| (key.clone(), field.clone()))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| filter_fields(item, allowed_fields))
                .collect(),
        ),
        other => other.clone(),
    }
}
