//! Dotted path lookup into a context.

use serde_json::Value;

/// Resolves a dot-separated `path` against `context`.
///
/// Each segment descends one mapping key. Resolution fails with `None` as soon
/// as the current value is not a mapping or lacks the key; sequences are not
/// indexed.
///
/// ```rust
/// use serde_json::json;
/// use templify::resolve_path;
///
/// let context = json!({"user": {"profile": {"name": "Alice"}}});
/// assert_eq!(resolve_path(&context, "user.profile.name"), Some(&json!("Alice")));
/// assert_eq!(resolve_path(&context, "user.email"), None);
/// ```
pub fn resolve_path<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = context;

    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }

    Some(current)
}

// Characters that mark brace-delimited text as data or markup rather than a
// key reference, e.g. JSON objects or CSS blocks.
const STRUCTURAL_CHARS: &[char] = &[
    '"', '\'', '`', ':', ';', ',', '=', '{', '}', '(', ')', '[', ']', '|',
];

/// Returns `true` if `path` can name a context entry: one or more non-empty
/// segments joined by `.`.
///
/// Segments may hold any key text, including spaces and symbols such as `@`,
/// but no leading or trailing whitespace, control characters or the
/// structural characters found in JSON and similar snippets.
///
/// ```rust
/// use templify::is_valid_path;
///
/// assert!(is_valid_path("user.first name"));
/// assert!(is_valid_path("@id"));
/// assert!(!is_valid_path(r#""key": 1"#));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment.trim() == segment
                && !segment
                    .chars()
                    .any(|c| c.is_control() || STRUCTURAL_CHARS.contains(&c))
        })
}

/// Inserts `value` at `path`, creating intermediate mappings as needed.
///
/// Returns `false` without modifying anything when an intermediate segment
/// exists but is not a mapping.
pub(crate) fn insert_path(context: &mut Value, path: &str, value: Value) -> bool {
    let mut segments = path.split('.').peekable();
    let mut current = context;

    while let Some(segment) = segments.next() {
        let Value::Object(map) = current else {
            return false;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return true;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_top_level() {
        let context = json!({"name": "World"});
        assert_eq!(resolve_path(&context, "name"), Some(&json!("World")));
    }

    #[test]
    fn test_resolve_nested() {
        let context = json!({"user": {"profile": {"name": "Alice"}}});
        assert_eq!(
            resolve_path(&context, "user.profile.name"),
            Some(&json!("Alice"))
        );
        assert_eq!(
            resolve_path(&context, "user.profile"),
            Some(&json!({"name": "Alice"}))
        );
    }

    #[test]
    fn test_resolve_missing_key() {
        let context = json!({"user": {"name": "Alice"}});
        assert_eq!(resolve_path(&context, "user.age"), None);
        assert_eq!(resolve_path(&context, "account"), None);
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let context = json!({"user": "Alice"});
        assert_eq!(resolve_path(&context, "user.name"), None);
    }

    #[test]
    fn test_resolve_does_not_index_sequences() {
        let context = json!({"items": ["a", "b"]});
        assert_eq!(resolve_path(&context, "items.0"), None);
    }

    #[test]
    fn test_value_equal_to_its_path_is_found() {
        let context = json!({"name": "name"});
        assert_eq!(resolve_path(&context, "name"), Some(&json!("name")));
    }

    #[test]
    fn test_resolve_null_is_found() {
        let context = json!({"value": null});
        assert_eq!(resolve_path(&context, "value"), Some(&Value::Null));
    }

    #[test]
    fn test_valid_paths() {
        assert!(is_valid_path("name"));
        assert!(is_valid_path("user.profile.first_name"));
        assert!(is_valid_path("order-id.2"));
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("user..name"));
        assert!(!is_valid_path(".name"));
        assert!(!is_valid_path("\"key\": 1"));
        assert!(is_valid_path("first name"));
        assert!(is_valid_path("@id"));
        assert!(is_valid_path("meta.@type"));
        assert!(!is_valid_path("a .b"));
        assert!(!is_valid_path("color: red"));
        assert!(!is_valid_path("a, b"));
        assert!(!is_valid_path("line\nbreak"));
    }

    #[test]
    fn test_resolve_keys_with_spaces_and_symbols() {
        let context = json!({"first name": "Ada", "@id": "urn:1"});
        assert_eq!(resolve_path(&context, "first name"), Some(&json!("Ada")));
        assert_eq!(resolve_path(&context, "@id"), Some(&json!("urn:1")));
    }

    #[test]
    fn test_insert_path_creates_mappings() {
        let mut context = json!({"user": {"name": "Alice"}});
        assert!(insert_path(&mut context, "user.age", json!(30)));
        assert!(insert_path(&mut context, "account.id", json!("x")));
        assert_eq!(
            context,
            json!({"user": {"name": "Alice", "age": 30}, "account": {"id": "x"}})
        );
    }

    #[test]
    fn test_insert_path_refuses_scalar_parent() {
        let mut context = json!({"user": "Alice"});
        assert!(!insert_path(&mut context, "user.name", json!("Bob")));
        assert_eq!(context, json!({"user": "Alice"}));
    }
}
