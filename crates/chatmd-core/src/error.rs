//! Diagnostics recorded while parsing a reply.
//!
//! Rendering never fails. When the parser has to degrade (a fence that is
//! never closed, a language tag that cannot be used as a class name, a
//! header deeper than the dialect supports) it still produces a document and
//! records a [`ParseError`] describing what it did instead.

use crate::span::Span;
use thiserror::Error;

/// Categories of recoverable findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Opening code fence with no closing fence.
    UnclosedDelimiter,
    /// Syntax outside the supported dialect, rendered as text.
    InvalidSyntax,
    /// Fence language tag that is not a plain alphanumeric token.
    InvalidLanguageTag,
}

impl ParseErrorKind {
    /// Stable lowercase name used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::UnclosedDelimiter => "unclosed-delimiter",
            ParseErrorKind::InvalidSyntax => "invalid-syntax",
            ParseErrorKind::InvalidLanguageTag => "invalid-language-tag",
        }
    }
}

/// A diagnostic with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", location_suffix(.span))]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Source location the diagnostic refers to.
    pub span: Option<Span>,
    pub kind: ParseErrorKind,
    /// Always true for the findings this parser records; the document is
    /// complete regardless.
    pub recoverable: bool,
}

impl ParseError {
    pub fn new(message: impl Into<String>, kind: ParseErrorKind, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            recoverable: true,
        }
    }

    /// A code fence opened at `span` that is never closed.
    pub fn unclosed_fence(span: Option<Span>) -> Self {
        Self::new(
            "unclosed code fence, rendered as text",
            ParseErrorKind::UnclosedDelimiter,
            span,
        )
    }

    /// A header with more `#` markers than the dialect supports.
    pub fn header_too_deep(level: usize, span: Option<Span>) -> Self {
        Self::new(
            format!("header level {level} is not supported, rendered as text"),
            ParseErrorKind::InvalidSyntax,
            span,
        )
    }

    /// A fence info string that was dropped instead of emitted as a class.
    pub fn invalid_language_tag(tag: &str, span: Option<Span>) -> Self {
        Self::new(
            format!("language tag {tag:?} is not alphanumeric, dropped"),
            ParseErrorKind::InvalidLanguageTag,
            span,
        )
    }
}

fn location_suffix(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" at bytes {}..{}", span.start, span.end),
        None => String::new(),
    }
}

/// Diagnostics collected during one parse, in source order.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Number of diagnostics of the given kind.
    pub fn count_of(&self, kind: ParseErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
