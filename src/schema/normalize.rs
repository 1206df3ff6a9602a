//! Outgoing payload normalization
//!
//! Payloads are round-tripped through their schema and then stripped of
//! anything the server does not expect to receive: nulls, empty arrays and
//! empty objects.

use serde_json::Value;

/// Recursively drop null, empty-array and empty-object values.
///
/// Array elements that end up empty are removed as well. Strings, numbers
/// and booleans are kept as they are, including `""`, `0` and `false`.
pub fn strip_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, strip_empty(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(strip_empty)
                .filter(|v| !is_empty(v))
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_removes_nulls_and_empty_collections() {
        let input = json!({
            "name": "stream",
            "description": null,
            "tags": [],
            "properties": {},
            "private": false,
            "layers": [{"name": "l1", "topology": null}]
        });

        let stripped = strip_empty(input);
        assert_eq!(
            stripped,
            json!({"name": "stream", "private": false, "layers": [{"name": "l1"}]})
        );
    }

    #[test]
    fn test_strip_cascades_through_nesting() {
        let input = json!({"permissions": {"canRead": [], "canWrite": null}});
        assert_eq!(strip_empty(input), json!({}));
    }

    #[test]
    fn test_strip_keeps_falsy_scalars() {
        let input = json!({"value": 0, "text": "", "closed": false});
        assert_eq!(strip_empty(input.clone()), input);
    }
}
