//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait which allows templify to
//! render text with different backends. [`PlaceholderEngine`](super::PlaceholderEngine)
//! handles `{path}` and `{{ query }}` placeholders; [`MiniJinjaEngine`] handles
//! full templates with loops, conditionals, macros and filters.

use std::collections::HashSet;

use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::options::{MissingKeyPolicy, RenderOptions};
use crate::path::{insert_path, resolve_path};

/// A template engine that can render templates against a context.
///
/// Engines honor the [`MissingKeyPolicy`] carried by the [`RenderOptions`]
/// passed to each call; nothing about a render is configured process-wide.
pub trait TemplateEngine: Send + Sync {
    /// Renders a template string against `context`.
    fn render_template(
        &self,
        template: &str,
        context: &serde_json::Value,
        options: &RenderOptions,
    ) -> Result<String>;

    /// Adds a named template to the engine.
    fn add_template(&mut self, name: &str, source: &str) -> Result<()>;

    /// Renders a template previously registered with
    /// [`add_template`](Self::add_template).
    fn render_named(
        &self,
        name: &str,
        context: &serde_json::Value,
        options: &RenderOptions,
    ) -> Result<String>;

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;

    /// Whether this engine supports control flow (`{% for %}`, `{% if %}`).
    fn supports_control_flow(&self) -> bool;
}

// Functions MiniJinja provides as globals; never shadowed by filled-in values.
const BUILTIN_GLOBALS: &[&str] = &["range", "dict", "debug", "namespace"];

const INLINE_TEMPLATE_NAME: &str = "<inline>";

/// MiniJinja-based template engine.
///
/// Provides the full template language (loops, conditionals, macros, filters,
/// includes) plus the `jmespath` / `queryfn` query filters. The missing-key
/// policy maps onto MiniJinja's undefined handling:
///
/// - `Keep`: each undeclared variable missing from the context renders as its
///   own placeholder text, e.g. `{{ name }}`
/// - `Default`: each undeclared variable missing from the context renders as
///   its inferred default
/// - `Raise`: strict undefined handling; any undefined access fails with
///   [`RenderError::MissingVariable`] naming the variable of the failing
///   expression
///
/// Kept text and defaults are ordinary strings in the context, so filters
/// still apply to them: under `Keep`, `{{ nick | upper }}` renders as
/// `{{ NICK }}`.
///
/// # Example
///
/// ```rust
/// use templify::{MiniJinjaEngine, RenderOptions, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let output = engine.render_template(
///     "{% for item in items %}{{ item | upper }} {% endfor %}",
///     &json!({"items": ["a", "b"]}),
///     &RenderOptions::new(),
/// ).unwrap();
/// assert_eq!(output, "A B ");
/// ```
#[derive(Debug, Clone)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
    globals: HashSet<String>,
}

impl MiniJinjaEngine {
    /// Creates a new MiniJinja engine with the query filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        super::filters::register_filters(&mut env);
        Self {
            env,
            globals: HashSet::new(),
        }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Use this to register custom filters or tests. Globals should go through
    /// [`add_global`](Self::add_global) so missing-key handling never shadows
    /// them.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Adds a global variable visible to every template.
    pub fn add_global<V: Serialize>(&mut self, name: &str, value: V) {
        self.env
            .add_global(name.to_string(), Value::from_serialize(&value));
        self.globals.insert(name.to_string());
    }

    fn environment_for(&self, policy: MissingKeyPolicy) -> Environment<'static> {
        let mut env = self.env.clone();
        env.set_undefined_behavior(match policy {
            MissingKeyPolicy::Raise => UndefinedBehavior::Strict,
            MissingKeyPolicy::Keep | MissingKeyPolicy::Default => UndefinedBehavior::Chainable,
        });
        env
    }

    /// Undeclared variables of `name` that the context cannot resolve, sorted.
    fn missing_variables(
        &self,
        env: &Environment<'static>,
        name: &str,
        context: &serde_json::Value,
    ) -> Result<Vec<String>> {
        let template = env.get_template(name)?;
        let mut missing: Vec<String> = template
            .undeclared_variables(true)
            .into_iter()
            .filter(|var| {
                let root = var.split('.').next().unwrap_or(var);
                !BUILTIN_GLOBALS.contains(&root) && !self.globals.contains(root)
            })
            .filter(|var| resolve_path(context, var).is_none())
            .collect();
        missing.sort();
        Ok(missing)
    }

    fn render_in(
        &self,
        env: &Environment<'static>,
        name: &str,
        context: &serde_json::Value,
        options: &RenderOptions,
    ) -> Result<String> {
        let missing = self.missing_variables(env, name, context)?;
        let template = env.get_template(name)?;

        let filled;
        let context = match options.policy {
            MissingKeyPolicy::Raise => context,
            MissingKeyPolicy::Keep | MissingKeyPolicy::Default => {
                let mut ctx = context.clone();
                for var in &missing {
                    let replacement = match options.policy {
                        MissingKeyPolicy::Keep => format!("{{{{ {} }}}}", var),
                        _ => options.defaults.infer(var).to_string(),
                    };
                    insert_path(&mut ctx, var, serde_json::Value::String(replacement));
                }
                filled = ctx;
                &filled
            }
        };

        debug!(
            template = name,
            policy = %options.policy,
            missing = missing.len(),
            "rendering with minijinja"
        );

        match template.render(Value::from_serialize(context)) {
            Ok(output) => Ok(output),
            Err(err) if err.kind() == ErrorKind::UndefinedError => {
                let variable = failing_variable(template.source(), &err, &missing)
                    .or_else(|| missing.first().cloned())
                    .unwrap_or_else(|| err.detail().unwrap_or("undefined value").to_string());
                Err(RenderError::MissingVariable(variable))
            }
            Err(err) => Err(query_error_from(&err).unwrap_or_else(|| err.into())),
        }
    }
}

/// Picks the missing variable referenced by the expression that failed.
///
/// The error's span covers the failing expression. The candidate appearing
/// earliest in it wins, the longer path on a tie.
fn failing_variable(source: &str, err: &minijinja::Error, missing: &[String]) -> Option<String> {
    let expression = source.get(err.range()?)?;
    missing
        .iter()
        .filter_map(|var| find_reference(expression, var).map(|pos| (pos, var)))
        .min_by_key(|(pos, var)| (*pos, std::cmp::Reverse(var.len())))
        .map(|(_, var)| var.clone())
}

/// Byte offset of `name` in `expression` where it is not part of a longer
/// identifier.
fn find_reference(expression: &str, name: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    expression.match_indices(name).map(|(pos, _)| pos).find(|&pos| {
        let before = expression[..pos].chars().next_back();
        let after = expression[pos + name.len()..].chars().next();
        !before.is_some_and(|c| is_ident(c) || c == '.') && !after.is_some_and(is_ident)
    })
}

/// Recovers a query error raised inside the `jmespath` filter.
fn query_error_from(err: &minijinja::Error) -> Option<RenderError> {
    let source = std::error::Error::source(err)?.downcast_ref::<RenderError>()?;
    match source {
        RenderError::InvalidQuery { expression, reason } => Some(RenderError::InvalidQuery {
            expression: expression.clone(),
            reason: reason.clone(),
        }),
        RenderError::EmptyResult(query) => Some(RenderError::EmptyResult(query.clone())),
        _ => None,
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(
        &self,
        template: &str,
        context: &serde_json::Value,
        options: &RenderOptions,
    ) -> Result<String> {
        let mut env = self.environment_for(options.policy);
        env.add_template_owned(INLINE_TEMPLATE_NAME, template.to_string())?;
        self.render_in(&env, INLINE_TEMPLATE_NAME, context, options)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn render_named(
        &self,
        name: &str,
        context: &serde_json::Value,
        options: &RenderOptions,
    ) -> Result<String> {
        let env = self.environment_for(options.policy);
        self.render_in(&env, name, context, options)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn supports_control_flow(&self) -> bool {
        true
    }
}
