//! Text rendering backends.
//!
//! Two engines implement [`TemplateEngine`]:
//!
//! | Engine | Syntax | Use When |
//! |--------|--------|----------|
//! | [`PlaceholderEngine`] | `{path}`, `{{ path \| jmespath("expr") }}` | Substituting values into strings and data |
//! | [`MiniJinjaEngine`] | full Jinja2 (`{% for %}`, `{% if %}`, macros, filters) | Templates with control flow |
//!
//! [`Renderer`](crate::Renderer) picks between them per string: text containing
//! statement or comment tags (`{%`, `{#`) goes to MiniJinja, everything else to
//! the placeholder engine.

mod engine;
pub mod filters;
mod simple;

pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use simple::{format_value, PlaceholderEngine};

pub(crate) use simple::{render_placeholders, resolve_placeholder};
