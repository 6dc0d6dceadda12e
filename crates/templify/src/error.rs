//! Error types for placeholder rendering.
//!
//! This module provides [`RenderError`], the single error type returned by every
//! rendering operation. It abstracts over the query language and the MiniJinja
//! backend, so callers never have to match on third-party error types.

use thiserror::Error;

/// Error type for rendering operations.
///
/// Every failure aborts the render call it occurred in. Errors raised while
/// walking a nested tree bubble up unchanged; no partially rendered output is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A placeholder could not be resolved and the policy is
    /// [`MissingKeyPolicy::Raise`](crate::MissingKeyPolicy::Raise).
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// The placeholder body or the query expression is malformed, or the
    /// query language rejected it while evaluating.
    #[error("invalid query `{expression}`: {reason}")]
    InvalidQuery { expression: String, reason: String },

    /// A well-formed query evaluated to `null`.
    #[error("query `{0}` returned no result")]
    EmptyResult(String),

    /// Failure reported by the full template backend.
    #[error("template backend error: {0}")]
    TemplateBackend(String),

    /// Named template was never registered with the engine.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// I/O error (e.g., reading a template from disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value conversion between serde_json, JMESPath and MiniJinja failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RenderError {
    pub(crate) fn invalid_query(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        RenderError::InvalidQuery {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for the query failure category
    /// ([`InvalidQuery`](Self::InvalidQuery) and [`EmptyResult`](Self::EmptyResult)).
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidQuery { .. } | RenderError::EmptyResult(_)
        )
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}

impl From<jmespath::JmespathError> for RenderError {
    fn from(err: jmespath::JmespathError) -> Self {
        RenderError::invalid_query(err.expression.clone(), err.to_string())
    }
}

// Undefined errors only occur under strict handling, which is how the
// Raise policy is expressed to MiniJinja.
impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::UndefinedError => {
                let detail = err.detail().unwrap_or("undefined value").to_string();
                RenderError::MissingVariable(detail)
            }
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::BadSerialization => RenderError::Serialization(err.to_string()),
            _ => RenderError::TemplateBackend(err.to_string()),
        }
    }
}
