//! Property-based tests for templify using proptest.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use templify::{render_data, render_text, MissingKeyPolicy};

// ============================================================================
// Strategies
// ============================================================================

// Text without any braces, so it can never contain placeholder syntax.
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;!?_\\-]{0,20}"
}

fn plain_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        plain_text().prop_map(Value::String),
    ]
}

fn plain_tree() -> impl Strategy<Value = Value> {
    plain_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn policy() -> impl Strategy<Value = MissingKeyPolicy> {
    prop_oneof![
        Just(MissingKeyPolicy::Keep),
        Just(MissingKeyPolicy::Default),
        Just(MissingKeyPolicy::Raise),
    ]
}

// Replaces every string leaf with a placeholder for a context key.
fn with_placeholders(tree: &Value) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), with_placeholders(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(with_placeholders).collect()),
        Value::String(_) => Value::String("{value}".to_string()),
        other => other.clone(),
    }
}

fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| same_shape(v, other)))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(v, other)| same_shape(v, other))
        }
        (Value::Object(_), _) | (Value::Array(_), _) | (_, Value::Object(_)) | (_, Value::Array(_)) => {
            false
        }
        _ => true,
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Trees without placeholder syntax render to themselves.
    #[test]
    fn placeholder_free_tree_is_unchanged(tree in plain_tree(), policy in policy()) {
        let context = json!({"value": "ctx", "other": {"nested": 1}});
        let rendered = render_data(&tree, &context, policy).unwrap();
        prop_assert_eq!(rendered, tree);
    }

    /// Substituting scalars never changes the structural skeleton.
    #[test]
    fn rendering_preserves_shape(tree in plain_tree(), value in plain_text()) {
        let template = with_placeholders(&tree);
        let context = json!({"value": value});
        let rendered = render_data(&template, &context, MissingKeyPolicy::Raise).unwrap();
        prop_assert!(same_shape(&rendered, &template));
    }

    /// A missing simple reference is kept verbatim under Keep.
    #[test]
    fn missing_reference_is_kept(path in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}", prefix in plain_text()) {
        let template = format!("{}{{{}}}", prefix, path);
        let rendered = render_text(&template, &json!({}), MissingKeyPolicy::Keep).unwrap();
        prop_assert_eq!(rendered, template);
    }

    /// A present simple reference renders as the value's text.
    #[test]
    fn present_reference_is_substituted(key in "[a-z]{1,8}", value in plain_text()) {
        let context = json!({ key.clone(): value.clone() });
        let rendered = render_text(&format!("<{{{}}}>", key), &context, MissingKeyPolicy::Raise).unwrap();
        prop_assert_eq!(rendered, format!("<{}>", value));
    }

    /// Rendering is deterministic.
    #[test]
    fn rendering_is_deterministic(tree in plain_tree(), value in plain_text()) {
        let template = with_placeholders(&tree);
        let context = json!({"value": value});
        let first = render_data(&template, &context, MissingKeyPolicy::Keep).unwrap();
        let second = render_data(&template, &context, MissingKeyPolicy::Keep).unwrap();
        prop_assert_eq!(first, second);
    }
}
