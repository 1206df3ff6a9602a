//! Property-based tests using proptest
//!
//! These tests verify query-string construction, payload normalization,
//! type-tag resolution and envelope handling using randomized inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use speckle::resource::envelope::{open, Payload};
use speckle::schema::strip_empty;
use speckle::{Query, SchemaKind, SchemaRegistry};

/// Generate arbitrary JSON documents, nulls and empty containers included
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn has_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty() || items.iter().any(has_empty),
        Value::Object(map) => map.is_empty() || map.values().any(has_empty),
        _ => false,
    }
}

mod query_properties {
    use super::*;

    proptest! {
        #[test]
        fn query_string_shape(
            params in prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,8}"), 0..8)
        ) {
            let query = params
                .iter()
                .fold(Query::new(), |q, (k, v)| q.with(k, v.as_str()));
            let rendered = query.to_query_string();

            if params.is_empty() {
                prop_assert_eq!(rendered, "");
            } else {
                prop_assert!(rendered.starts_with('?'));
                prop_assert!(!rendered.ends_with('&'));
                prop_assert!(!rendered.contains("&&"));
                prop_assert!(!rendered.contains(' '));
                prop_assert_eq!(rendered.matches('&').count(), params.len() - 1);
            }
        }

        #[test]
        fn list_values_join_with_commas(values in prop::collection::vec("[a-z]{1,6}", 1..6)) {
            let rendered = Query::new().with("fields", values.clone()).to_query_string();
            prop_assert_eq!(rendered, format!("?fields={}", values.join(",")));
        }
    }
}

mod normalize_properties {
    use super::*;

    proptest! {
        #[test]
        fn strip_empty_is_idempotent(value in arb_json()) {
            let once = strip_empty(value);
            let twice = strip_empty(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn stripped_objects_hold_no_empties(map in prop::collection::btree_map("[a-z]{1,4}", arb_json(), 0..8)) {
            let stripped = strip_empty(Value::Object(map.into_iter().collect()));
            match &stripped {
                Value::Object(fields) => prop_assert!(fields.values().all(|v| !has_empty(v))),
                other => prop_assert!(false, "object became {:?}", other),
            }
        }

        #[test]
        fn falsy_scalars_survive(flag in any::<bool>(), n in -3i32..3) {
            let stripped = strip_empty(json!({"flag": flag, "n": n, "s": ""}));
            prop_assert_eq!(stripped, json!({"flag": flag, "n": n, "s": ""}));
        }
    }
}

mod resolve_properties {
    use super::*;

    proptest! {
        #[test]
        fn last_known_segment_wins(prefix in prop::collection::vec("[a-z]{3,8}x", 0..4)) {
            // The `x` suffix keeps generated segments clear of registered tags
            let registry = SchemaRegistry::builtin();
            let mut segments = prefix.clone();
            segments.push("Line".to_string());
            segments.push("point".to_string());
            prop_assert_eq!(registry.resolve(&segments.join("/")), Some(SchemaKind::Point));

            let mut trailing_unknown = prefix;
            trailing_unknown.push("MESH".to_string());
            trailing_unknown.push("zzzx".to_string());
            prop_assert_eq!(registry.resolve(&trailing_unknown.join("/")), Some(SchemaKind::Mesh));
        }

        #[test]
        fn unknown_tags_resolve_to_nothing(segments in prop::collection::vec("[a-z]{3,8}x", 1..5)) {
            let registry = SchemaRegistry::builtin();
            prop_assert_eq!(registry.resolve(&segments.join("/")), None);
        }
    }
}

mod envelope_properties {
    use super::*;

    proptest! {
        #[test]
        fn resources_keep_order_and_length(ids in prop::collection::vec("[a-f0-9]{6}", 0..50)) {
            let body = json!({
                "success": true,
                "resources": ids.iter().map(|id| json!({"_id": id})).collect::<Vec<_>>()
            });

            match open(body, 200) {
                Ok(Payload::Many(items)) => {
                    let returned: Vec<_> = items
                        .iter()
                        .map(|i| i["_id"].as_str().unwrap_or_default().to_string())
                        .collect();
                    prop_assert_eq!(returned, ids);
                },
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        #[test]
        fn failed_envelopes_never_yield_payloads(message in "[a-zA-Z .]{0,30}") {
            let result = open(json!({"success": false, "message": message}), 400);
            prop_assert!(result.is_err());
        }
    }
}
