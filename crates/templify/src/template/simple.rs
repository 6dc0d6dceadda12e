//! Placeholder substitution engine.
//!
//! This module provides [`PlaceholderEngine`], the text renderer behind
//! [`render_text`](crate::render_text). It substitutes two placeholder forms:
//!
//! - `{name}`, `{user.name}`: dotted path references into the context
//! - `{{ name }}`, `{{ products | jmespath("max_by(@, &sales).name") }}`: bare
//!   paths or JMESPath queries over the value at a path
//!
//! Unresolved placeholders are handled by the
//! [`MissingKeyPolicy`](crate::MissingKeyPolicy) in the render options.
//!
//! # Example
//!
//! ```rust
//! use templify::{PlaceholderEngine, RenderOptions, TemplateEngine};
//! use serde_json::json;
//!
//! let engine = PlaceholderEngine::new();
//! let data = json!({"name": "World", "user": {"email": "test@example.com"}});
//!
//! let output = engine.render_template(
//!     "Hello, {name}! Contact: {{ user.email }}",
//!     &data,
//!     &RenderOptions::new(),
//! ).unwrap();
//!
//! assert_eq!(output, "Hello, World! Contact: test@example.com");
//! ```
//!
//! # Limitations
//!
//! PlaceholderEngine intentionally does NOT support loops, conditionals,
//! filters other than the query functions, includes or macros. For these, use
//! [`MiniJinjaEngine`](super::MiniJinjaEngine).

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::error::{RenderError, Result};
use crate::options::{MissingKeyPolicy, RenderOptions};
use crate::path::resolve_path;
use crate::placeholder::{tokenize, Expression, Placeholder, Token};
use crate::query::evaluate_query;

use super::TemplateEngine;

/// Placeholder substitution engine.
///
/// `PlaceholderEngine` is `Send + Sync` and can be shared across threads; it
/// holds nothing but registered template sources.
#[derive(Debug, Default)]
pub struct PlaceholderEngine {
    templates: HashMap<String, String>,
}

impl PlaceholderEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolves one placeholder against `context`.
///
/// Returns `Ok(None)` when the data path is missing. Query failures are errors
/// regardless of policy.
pub(crate) fn resolve_placeholder<'a>(
    placeholder: &Placeholder<'_>,
    context: &'a Value,
    options: &RenderOptions,
) -> Result<Option<Cow<'a, Value>>> {
    match placeholder.expression(options)? {
        Expression::Path(path) => Ok(resolve_path(context, path).map(Cow::Borrowed)),
        Expression::Query { path, query, .. } => match resolve_path(context, path) {
            Some(data) => evaluate_query(query, data).map(|value| Some(Cow::Owned(value))),
            None => Ok(None),
        },
    }
}

/// Text emitted for an unresolved placeholder, or the `MissingVariable` error.
fn missing_replacement<'a>(
    placeholder: &Placeholder<'a>,
    options: &'a RenderOptions,
) -> Result<&'a str> {
    let path = placeholder.expression(options)?;
    match options.policy {
        MissingKeyPolicy::Keep => Ok(placeholder.raw),
        MissingKeyPolicy::Default => Ok(options.defaults.infer(path.path())),
        MissingKeyPolicy::Raise => Err(RenderError::MissingVariable(path.path().to_string())),
    }
}

/// Formats a JSON value as a string for output.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Renders every placeholder in `template` against `context`.
pub(crate) fn render_placeholders(
    template: &str,
    context: &Value,
    options: &RenderOptions,
) -> Result<String> {
    let mut result = String::with_capacity(template.len());

    for token in tokenize(template) {
        match token {
            Token::Literal(text) => result.push_str(text),
            Token::Placeholder(placeholder) => {
                match resolve_placeholder(&placeholder, context, options)? {
                    Some(value) => {
                        trace!(placeholder = placeholder.raw, "resolved placeholder");
                        result.push_str(&format_value(&value));
                    }
                    None => {
                        trace!(
                            placeholder = placeholder.raw,
                            policy = %options.policy,
                            "unresolved placeholder"
                        );
                        result.push_str(missing_replacement(&placeholder, options)?);
                    }
                }
            }
        }
    }

    Ok(result)
}

impl TemplateEngine for PlaceholderEngine {
    fn render_template(
        &self,
        template: &str,
        context: &Value,
        options: &RenderOptions,
    ) -> Result<String> {
        render_placeholders(template, context, options)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.templates.insert(name.to_string(), source.to_string());
        Ok(())
    }

    fn render_named(&self, name: &str, context: &Value, options: &RenderOptions) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))?;
        render_placeholders(template, context, options)
    }

    fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn supports_control_flow(&self) -> bool {
        false
    }
}
