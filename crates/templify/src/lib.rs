//! # Templify - Placeholder Rendering for Strings and Data
//!
//! `templify` substitutes placeholders in strings and in arbitrarily nested data
//! (`serde_json::Value` trees) with values from a context, optionally running
//! JMESPath queries over that context.
//!
//! ## Placeholder Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{user.name}` | Value at a dotted path |
//! | `{{ user.name }}` | Same, double-brace form |
//! | `{{ products \| jmespath("max_by(@, &sales).name") }}` | JMESPath query over the value at `products` |
//!
//! Strings that use Jinja statements or comments (`{% ... %}`, `{# ... #}`) are
//! rendered by MiniJinja instead, so loops, conditionals and macros work too.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use templify::{render_data, render_text, MissingKeyPolicy};
//!
//! let context = json!({
//!     "user": {"name": "Alice", "notifications": 5},
//!     "products": [
//!         {"name": "A", "sales": 100},
//!         {"name": "B", "sales": 150},
//!     ],
//! });
//!
//! let text = render_text(
//!     "Welcome, {user.name}! You have {user.notifications} new messages.",
//!     &context,
//!     MissingKeyPolicy::Keep,
//! ).unwrap();
//! assert_eq!(text, "Welcome, Alice! You have 5 new messages.");
//!
//! let data = render_data(
//!     &json!({
//!         "top": r#"{{ products | jmespath("max_by(@, &sales).name") }}"#,
//!         "owner": "{user}",
//!     }),
//!     &context,
//!     MissingKeyPolicy::Keep,
//! ).unwrap();
//! assert_eq!(data, json!({
//!     "top": "B",
//!     "owner": {"name": "Alice", "notifications": 5},
//! }));
//! ```
//!
//! ## Missing Keys
//!
//! [`MissingKeyPolicy`] decides what an unresolved placeholder becomes:
//!
//! ```rust
//! use serde_json::json;
//! use templify::{render_text, MissingKeyPolicy, RenderError};
//!
//! let empty = json!({});
//! assert_eq!(render_text("{missing}", &empty, MissingKeyPolicy::Keep).unwrap(), "{missing}");
//! assert_eq!(render_text("{count_num}", &empty, MissingKeyPolicy::Default).unwrap(), "0");
//! assert!(matches!(
//!     render_text("{missing}", &empty, MissingKeyPolicy::Raise),
//!     Err(RenderError::MissingVariable(_))
//! ));
//! ```
//!
//! Query failures ([`RenderError::InvalidQuery`], [`RenderError::EmptyResult`])
//! are errors under every policy.
//!
//! ## Key Types
//!
//! - [`Renderer`]: reusable configuration plus the full template backend
//! - [`RenderOptions`], [`DefaultRules`]: per-render configuration
//! - [`TemplateEngine`]: backend abstraction, implemented by
//!   [`PlaceholderEngine`] and [`MiniJinjaEngine`]

mod error;
mod options;
mod path;
pub mod placeholder;
mod query;
mod renderer;
pub mod template;
mod tree;

use std::path::Path;

use serde_json::Value;

pub use error::{RenderError, Result};
pub use options::{
    DefaultRule, DefaultRules, MissingKeyPolicy, RenderOptions, DEFAULT_QUERY_FUNCTIONS,
};
pub use path::{is_valid_path, resolve_path};
pub use placeholder::{
    extract_placeholder_value, is_placeholder, tokenize, Expression, Placeholder,
    PlaceholderKind, Token,
};
pub use query::evaluate_query;
pub use renderer::Renderer;
pub use template::{format_value, MiniJinjaEngine, PlaceholderEngine, TemplateEngine};

/// Renders the placeholders in `template` against `context`.
pub fn render_text(template: &str, context: &Value, policy: MissingKeyPolicy) -> Result<String> {
    Renderer::new().missing(policy).render_text(template, context)
}

/// Renders every string leaf of `tree` against `context`, returning a new tree.
pub fn render_data(tree: &Value, context: &Value, policy: MissingKeyPolicy) -> Result<Value> {
    Renderer::new().missing(policy).render_data(tree, context)
}

/// Renders a MiniJinja template string against `context`.
pub fn render_jinja(source: &str, context: &Value, policy: MissingKeyPolicy) -> Result<String> {
    Renderer::new().missing(policy).render_jinja(source, context)
}

/// Reads a MiniJinja template file and renders it against `context`.
pub fn render_jinja_file(
    path: impl AsRef<Path>,
    context: &Value,
    policy: MissingKeyPolicy,
) -> Result<String> {
    Renderer::new().missing(policy).render_jinja_file(path, context)
}
