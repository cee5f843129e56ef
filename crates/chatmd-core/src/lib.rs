//! # chatmd core
//!
//! Renders assistant chat replies written in a small markdown dialect to
//! HTML fragments.
//!
//! The dialect covers fenced code blocks, inline code, bold and italic,
//! headers up to level 3, horizontal rules, paragraphs and forced line
//! breaks. Everything else is shown as escaped text.
//!
//! ## Quick Start
//!
//! ```rust
//! let html = chatmd_core::render("# Title\n\nBody with **bold** text");
//! assert_eq!(html, "<h1>Title</h1><p>Body with <strong>bold</strong> text</p>");
//! ```
//!
//! ## Diagnostics
//!
//! Rendering never fails. Constructs the dialect cannot express degrade to
//! text, and the parser can report where that happened:
//!
//! ```rust
//! use chatmd_core::Parser;
//!
//! let result = Parser::new().parse_with_recovery("```rust\nfn main() {}");
//! assert_eq!(result.errors.len(), 1);
//! assert_eq!(result.document.blocks.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod escape;
pub mod export;
pub mod html;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod span;

pub use ast::{Block, Document, Inline};
pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use escape::{escape_html, EscapedText};
pub use export::PrintableDocument;
pub use html::{push_html, to_html};
pub use parser::{ParseResult, Parser};

/// Render `raw` to an HTML fragment.
///
/// Total and pure: any input produces a fragment, and no state survives the
/// call.
pub fn render(raw: &str) -> String {
    let doc = Parser::new().parse(raw);
    to_html(&doc)
}
