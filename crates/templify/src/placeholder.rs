//! Placeholder grammar.
//!
//! A template string is scanned once, left to right, into a sequence of
//! [`Token`]s. Placeholders are classified by their delimiters:
//!
//! - `{path}` is a simple reference. The trimmed body must be a valid dotted
//!   path, otherwise the braces are plain text (so JSON snippets and other
//!   brace-bearing text survive untouched).
//! - `{{ body }}` is a query placeholder. The body is either a bare path or
//!   `path | name("expression")`, where `name` is a configured query function.
//!
//! Placeholders never nest and never overlap; the shortest closing delimiter
//! wins.

use std::ops::Range;

use crate::error::{RenderError, Result};
use crate::options::RenderOptions;
use crate::path::is_valid_path;

/// A piece of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    Placeholder(Placeholder<'a>),
}

/// A placeholder occurrence within a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte range of the placeholder, delimiters included.
    pub span: Range<usize>,
    /// Source text of the placeholder, delimiters included.
    pub raw: &'a str,
    /// Text between the delimiters, trimmed.
    pub body: &'a str,
    pub kind: PlaceholderKind,
}

/// Which delimiter form a placeholder used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `{path}`
    Simple,
    /// `{{ ... }}`
    Query,
}

/// The parsed body of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<'a> {
    /// A dotted path looked up directly.
    Path(&'a str),
    /// A path whose value is fed through a query function.
    Query {
        path: &'a str,
        function: &'a str,
        query: &'a str,
    },
}

impl Expression<'_> {
    /// The context path this expression reads from.
    pub fn path(&self) -> &str {
        match self {
            Expression::Path(path) => path,
            Expression::Query { path, .. } => path,
        }
    }
}

impl<'a> Placeholder<'a> {
    /// Parses the body into an [`Expression`].
    ///
    /// Simple placeholders always parse to a path. Query placeholders containing
    /// `|` must have exactly the shape `path | name("expr")`, with `name` accepted
    /// by `options`.
    pub fn expression(&self, options: &RenderOptions) -> Result<Expression<'a>> {
        if self.kind == PlaceholderKind::Simple {
            return Ok(Expression::Path(self.body));
        }

        let Some((path, call)) = self.body.split_once('|') else {
            return Ok(Expression::Path(self.body));
        };
        let path = path.trim();
        let call = call.trim();

        let invalid = |reason: &str| RenderError::invalid_query(self.body, reason);

        if path.is_empty() {
            return Err(invalid("missing data path before '|'"));
        }

        let open = call
            .find('(')
            .ok_or_else(|| invalid("expected a query function call after '|'"))?;
        let (function, args) = call.split_at(open);
        let function = function.trim();
        if !options.is_query_function(function) {
            return Err(invalid(&format!(
                "unknown query function '{}', expected one of: {}",
                function,
                options.query_functions().join(", ")
            )));
        }

        let args = args
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid("unbalanced parentheses in query function call"))?
            .trim();
        let query = unquote(args)
            .ok_or_else(|| invalid("query function takes a single quoted expression"))?;

        Ok(Expression::Query {
            path,
            function,
            query,
        })
    }
}

fn unquote(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    // A bare quote inside the argument means more than one argument was given.
    (!inner.contains(quote)).then_some(inner)
}

/// Splits `text` into literal and placeholder tokens.
///
/// ```rust
/// use templify::{tokenize, Token};
///
/// let tokens = tokenize("Hi {name}, {{ total }}!");
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0], Token::Literal("Hi "));
/// ```
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('{') {
        let open = cursor + offset;

        match placeholder_at(text, open) {
            Some(placeholder) => {
                if literal_start < open {
                    tokens.push(Token::Literal(&text[literal_start..open]));
                }
                cursor = placeholder.span.end;
                literal_start = cursor;
                tokens.push(Token::Placeholder(placeholder));
            }
            None => cursor = open + 1,
        }
    }

    if literal_start < text.len() {
        tokens.push(Token::Literal(&text[literal_start..]));
    }

    tokens
}

fn placeholder_at(text: &str, open: usize) -> Option<Placeholder<'_>> {
    let rest = &text[open..];

    if let Some(after) = rest.strip_prefix("{{") {
        if let Some(close) = after.find("}}") {
            let end = open + 2 + close + 2;
            return Some(Placeholder {
                span: open..end,
                raw: &text[open..end],
                body: after[..close].trim(),
                kind: PlaceholderKind::Query,
            });
        }
        // Unclosed `{{`: the second brace may still open a simple placeholder.
        return None;
    }

    let after = &rest[1..];
    let close = after.find(['{', '}'])?;
    if !after[close..].starts_with('}') {
        return None;
    }
    let body = after[..close].trim();
    if !is_valid_path(body) {
        return None;
    }

    let end = open + 1 + close + 1;
    Some(Placeholder {
        span: open..end,
        raw: &text[open..end],
        body,
        kind: PlaceholderKind::Simple,
    })
}

/// Returns the placeholder if `text` consists of exactly one placeholder and
/// nothing else.
pub fn whole_placeholder(text: &str) -> Option<Placeholder<'_>> {
    match tokenize(text).as_slice() {
        [Token::Placeholder(placeholder)] => Some(placeholder.clone()),
        _ => None,
    }
}

/// Returns `true` if `text` is a single placeholder spanning the whole string.
///
/// ```rust
/// use templify::is_placeholder;
///
/// assert!(is_placeholder("{user.name}"));
/// assert!(is_placeholder("{{ products | jmespath('max_by(@, &sales).name') }}"));
/// assert!(!is_placeholder("regular text"));
/// assert!(!is_placeholder("{unclosed"));
/// ```
pub fn is_placeholder(text: &str) -> bool {
    whole_placeholder(text).is_some()
}

/// Returns the trimmed body of a whole-string placeholder, or `text` itself if
/// it is not one.
///
/// ```rust
/// use templify::extract_placeholder_value;
///
/// assert_eq!(extract_placeholder_value("{user.name}"), "user.name");
/// assert_eq!(extract_placeholder_value("regular text"), "regular text");
/// ```
pub fn extract_placeholder_value(text: &str) -> &str {
    whole_placeholder(text).map_or(text, |placeholder| placeholder.body)
}

/// Returns `true` if `text` uses MiniJinja statement or comment syntax, which
/// routes it to the full template backend.
pub fn has_statement_syntax(text: &str) -> bool {
    text.contains("{%") || text.contains("{#")
}
