//! Render configuration: missing-key policy, inferred defaults and query
//! function names.
//!
//! All configuration is passed per render call through [`RenderOptions`]; nothing
//! is registered process-wide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to emit when a placeholder cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Emit the placeholder text verbatim, braces included.
    #[default]
    Keep,
    /// Emit a default inferred from the path name (see [`DefaultRules`]).
    Default,
    /// Fail the render with [`RenderError::MissingVariable`](crate::RenderError::MissingVariable).
    Raise,
}

impl MissingKeyPolicy {
    pub const ALL: [MissingKeyPolicy; 3] = [
        MissingKeyPolicy::Keep,
        MissingKeyPolicy::Default,
        MissingKeyPolicy::Raise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissingKeyPolicy::Keep => "keep",
            MissingKeyPolicy::Default => "default",
            MissingKeyPolicy::Raise => "raise",
        }
    }
}

impl fmt::Display for MissingKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(MissingKeyPolicy::Keep),
            "default" => Ok(MissingKeyPolicy::Default),
            "raise" => Ok(MissingKeyPolicy::Raise),
            other => Err(format!(
                "unknown missing-key policy '{}', expected one of: keep, default, raise",
                other
            )),
        }
    }
}

/// A single naming hint: paths containing `pattern` default to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRule {
    pub pattern: String,
    pub value: String,
}

/// Ordered table of naming hints used by [`MissingKeyPolicy::Default`].
///
/// Rules are checked in order against the unresolved path; the first rule whose
/// pattern is a substring of the path wins. Paths matching no rule get
/// [`fallback`](Self::fallback).
///
/// ```rust
/// use templify::DefaultRules;
///
/// let rules = DefaultRules::default();
/// assert_eq!(rules.infer("order_num"), "0");
/// assert_eq!(rules.infer("tags_list"), "[]");
/// assert_eq!(rules.infer("is_active_bool"), "False");
/// assert_eq!(rules.infer("title"), "");
///
/// let rules = DefaultRules::empty().with_rule("_count", "0").with_fallback("n/a");
/// assert_eq!(rules.infer("item_count"), "0");
/// assert_eq!(rules.infer("title"), "n/a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRules {
    #[serde(default)]
    rules: Vec<DefaultRule>,
    #[serde(default)]
    fallback: String,
}

impl DefaultRules {
    /// A table with no rules and an empty fallback.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: String::new(),
        }
    }

    /// Appends a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, pattern: impl Into<String>, value: impl Into<String>) -> Self {
        self.rules.push(DefaultRule {
            pattern: pattern.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn rules(&self) -> &[DefaultRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Returns the default text for an unresolved `path`.
    pub fn infer(&self, path: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| path.contains(rule.pattern.as_str()))
            .map(|rule| rule.value.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for DefaultRules {
    fn default() -> Self {
        Self::empty()
            .with_rule("_num", "0")
            .with_rule("_list", "[]")
            .with_rule("_bool", "False")
    }
}

/// Function names accepted in `{{ path | name("expr") }}` placeholders.
pub const DEFAULT_QUERY_FUNCTIONS: &[&str] = &["jmespath", "queryfn"];

/// Options controlling a single render call.
///
/// ```rust
/// use templify::{MissingKeyPolicy, RenderOptions};
///
/// let options = RenderOptions::new()
///     .missing(MissingKeyPolicy::Default)
///     .query_function("jq");
/// assert!(options.is_query_function("jq"));
/// assert!(options.is_query_function("jmespath"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub policy: MissingKeyPolicy,
    pub defaults: DefaultRules,
    query_functions: Vec<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self {
            policy: MissingKeyPolicy::default(),
            defaults: DefaultRules::default(),
            query_functions: DEFAULT_QUERY_FUNCTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Options with the given policy and everything else at its default.
    pub fn with_policy(policy: MissingKeyPolicy) -> Self {
        Self::new().missing(policy)
    }

    pub fn missing(mut self, policy: MissingKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn defaults(mut self, defaults: DefaultRules) -> Self {
        self.defaults = defaults;
        self
    }

    /// Accepts an additional query function name.
    pub fn query_function(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.query_functions.contains(&name) {
            self.query_functions.push(name);
        }
        self
    }

    pub fn is_query_function(&self, name: &str) -> bool {
        self.query_functions.iter().any(|f| f == name)
    }

    pub fn query_functions(&self) -> &[String] {
        &self.query_functions
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<MissingKeyPolicy> for RenderOptions {
    fn from(policy: MissingKeyPolicy) -> Self {
        Self::with_policy(policy)
    }
}
