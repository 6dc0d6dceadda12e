//! Configured renderer.
//!
//! [`Renderer`] bundles [`RenderOptions`] with a full template backend and is the
//! entry point behind the crate-level [`render_text`](crate::render_text) and
//! [`render_data`](crate::render_data) functions. Build one when the same
//! configuration (policy, default rules, query function names, MiniJinja
//! filters) is reused across many renders.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::options::{DefaultRules, MissingKeyPolicy, RenderOptions};
use crate::placeholder::has_statement_syntax;
use crate::template::{render_placeholders, MiniJinjaEngine, TemplateEngine};
use crate::tree::render_node;

/// A renderer with fixed options and a full template backend.
///
/// Strings using statement or comment tags (`{% ... %}`, `{# ... #}`) are
/// rendered by the backend, which is [`MiniJinjaEngine`] unless replaced with
/// [`with_backend`](Self::with_backend). All other strings use placeholder
/// substitution.
///
/// Renderers hold no mutable state during a render and are `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use templify::{DefaultRules, MissingKeyPolicy, Renderer};
///
/// let renderer = Renderer::new()
///     .missing(MissingKeyPolicy::Default)
///     .defaults(DefaultRules::default().with_rule("_date", "1970-01-01"));
///
/// let output = renderer
///     .render_data(
///         &json!({"when": "{start_date}", "count": "{item_num}", "who": "{user.name}"}),
///         &json!({"user": {"name": "Alice"}}),
///     )
///     .unwrap();
///
/// assert_eq!(output, json!({"when": "1970-01-01", "count": "0", "who": "Alice"}));
/// ```
pub struct Renderer {
    options: RenderOptions,
    backend: Box<dyn TemplateEngine>,
}

impl Renderer {
    /// Creates a renderer with default options and a MiniJinja backend.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::new())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            backend: Box::new(MiniJinjaEngine::new()),
        }
    }

    /// Replaces the backend used for statement-bearing templates.
    pub fn with_backend(mut self, backend: Box<dyn TemplateEngine>) -> Self {
        self.backend = backend;
        self
    }

    pub fn missing(mut self, policy: MissingKeyPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn defaults(mut self, defaults: DefaultRules) -> Self {
        self.options.defaults = defaults;
        self
    }

    /// Accepts an additional query function name in `{{ path | name("expr") }}`.
    pub fn query_function(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.query_function(name);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn backend(&self) -> &dyn TemplateEngine {
        self.backend.as_ref()
    }

    /// Registers a named template with the backend.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.backend.add_template(name, source)
    }

    /// Renders a template previously registered with
    /// [`add_template`](Self::add_template).
    pub fn render_named(&self, name: &str, context: &Value) -> Result<String> {
        self.backend.render_named(name, context, &self.options)
    }

    /// Renders the placeholders in a string.
    pub fn render_text(&self, template: &str, context: &Value) -> Result<String> {
        if has_statement_syntax(template) {
            debug!(policy = %self.options.policy, "rendering text with template backend");
            return self.backend.render_template(template, context, &self.options);
        }
        render_placeholders(template, context, &self.options)
    }

    /// Renders every string leaf of `tree`, returning a new tree of the same
    /// shape. `tree` itself is never modified.
    pub fn render_data(&self, tree: &Value, context: &Value) -> Result<Value> {
        debug!(policy = %self.options.policy, "rendering data tree");
        render_node(self, tree, context)
    }

    /// Renders `source` with the template backend, regardless of its syntax.
    pub fn render_jinja(&self, source: &str, context: &Value) -> Result<String> {
        self.backend.render_template(source, context, &self.options)
    }

    /// Reads a template file and renders it with the template backend.
    pub fn render_jinja_file(&self, path: impl AsRef<Path>, context: &Value) -> Result<String> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading template file");
        let source = std::fs::read_to_string(path)?;
        self.render_jinja(&source, context)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<RenderOptions> for Renderer {
    fn from(options: RenderOptions) -> Self {
        Self::with_options(options)
    }
}
