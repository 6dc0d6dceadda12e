//! Recursive rendering of nested data.

use serde_json::Value;

use crate::error::Result;
use crate::placeholder::{has_statement_syntax, whole_placeholder};
use crate::renderer::Renderer;
use crate::template::{format_value, resolve_placeholder};

/// Renders every string leaf of `node`, preserving the shape of the tree.
///
/// A string that is exactly one placeholder resolving to a mapping or sequence
/// is replaced by that structured value; every other string goes through text
/// rendering. Non-string scalars are returned unchanged.
pub(crate) fn render_node(renderer: &Renderer, node: &Value, context: &Value) -> Result<Value> {
    match node {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| Ok((key.clone(), render_node(renderer, value, context)?)))
            .collect::<Result<serde_json::Map<_, _>>>()
            .map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|item| render_node(renderer, item, context))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::String(text) => render_leaf(renderer, text, context),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(node.clone()),
    }
}

fn render_leaf(renderer: &Renderer, text: &str, context: &Value) -> Result<Value> {
    if !has_statement_syntax(text) {
        if let Some(placeholder) = whole_placeholder(text) {
            if let Some(value) = resolve_placeholder(&placeholder, context, renderer.options())? {
                if value.is_object() || value.is_array() {
                    return Ok(value.into_owned());
                }
                return Ok(Value::String(format_value(&value)));
            }
        }
    }

    renderer.render_text(text, context).map(Value::String)
}
