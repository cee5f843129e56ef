//! Python bindings for the chatmd renderer.

use chatmd_core::{
    error::{ParseError as CoreParseError, ParseErrorKind as CoreParseErrorKind},
    export::{PrintableDocument, DEFAULT_TITLE},
    span::Span as CoreSpan,
    Parser as CoreParser,
};
use pyo3::prelude::*;

// ============================================================================
// Span
// ============================================================================

/// Source location in the input text (byte offsets).
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    #[getter]
    fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostic category.
#[pyclass(frozen, eq, eq_int, name = "DiagnosticKind")]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PyDiagnosticKind {
    UnclosedDelimiter,
    InvalidSyntax,
    InvalidLanguageTag,
}

impl From<CoreParseErrorKind> for PyDiagnosticKind {
    fn from(k: CoreParseErrorKind) -> Self {
        match k {
            CoreParseErrorKind::UnclosedDelimiter => PyDiagnosticKind::UnclosedDelimiter,
            CoreParseErrorKind::InvalidSyntax => PyDiagnosticKind::InvalidSyntax,
            CoreParseErrorKind::InvalidLanguageTag => PyDiagnosticKind::InvalidLanguageTag,
        }
    }
}

/// A construct that was rendered as text instead of markup.
#[pyclass(frozen, get_all, name = "Diagnostic")]
#[derive(Clone)]
pub struct PyDiagnostic {
    pub message: String,
    pub span: Option<PySpan>,
    pub kind: PyDiagnosticKind,
    pub recoverable: bool,
}

#[pymethods]
impl PyDiagnostic {
    fn __repr__(&self) -> String {
        format!("Diagnostic({:?}, {:?})", self.message, self.kind)
    }

    fn __str__(&self) -> String {
        match &self.span {
            Some(s) => format!("{} at bytes {}..{}", self.message, s.start, s.end),
            None => self.message.clone(),
        }
    }
}

impl From<CoreParseError> for PyDiagnostic {
    fn from(e: CoreParseError) -> Self {
        PyDiagnostic {
            message: e.message,
            span: e.span.map(PySpan::from),
            kind: e.kind.into(),
            recoverable: e.recoverable,
        }
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Render a reply to an HTML fragment.
///
/// Args:
///     text: Raw reply text
///
/// Returns:
///     str: HTML fragment; never raises
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn render(py: Python<'_>, text: &str) -> String {
    py.allow_threads(|| chatmd_core::render(text))
}

/// Escape `& < > " '` for safe inclusion in HTML.
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn escape_html(text: &str) -> String {
    chatmd_core::escape_html(text).into_inner().into_owned()
}

/// Wrap a rendered fragment in a standalone printable HTML document.
///
/// Args:
///     fragment: Output of `render`, inserted as-is
///     title: Header and page title (default: "Assistant Response")
///     generated_at: Footer timestamp; omitted when None
#[pyfunction]
#[pyo3(
    signature = (fragment, title=None, generated_at=None),
    text_signature = "(fragment, title=None, generated_at=None)"
)]
fn printable_document(fragment: &str, title: Option<&str>, generated_at: Option<&str>) -> String {
    let mut doc = PrintableDocument::new(title.unwrap_or(DEFAULT_TITLE));
    if let Some(ts) = generated_at {
        doc = doc.generated_at(ts);
    }
    doc.wrap(fragment)
}

/// List the constructs in `text` that degrade to plain text.
///
/// Returns:
///     list[Diagnostic]: Empty when the reply uses only supported markup
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn validate(text: &str) -> Vec<PyDiagnostic> {
    let result = CoreParser::new().parse_with_recovery(text);
    result.errors.into_iter().map(PyDiagnostic::from).collect()
}

// ============================================================================
// Module
// ============================================================================

/// chatmd - Markdown renderer for assistant chat replies.
#[pymodule]
fn pychatmd(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyDiagnosticKind>()?;
    m.add_class::<PyDiagnostic>()?;
    m.add_function(wrap_pyfunction!(render, m)?)?;
    m.add_function(wrap_pyfunction!(escape_html, m)?)?;
    m.add_function(wrap_pyfunction!(printable_document, m)?)?;
    m.add_function(wrap_pyfunction!(validate, m)?)?;
    m.add("DEFAULT_TITLE", DEFAULT_TITLE)?;
    Ok(())
}
