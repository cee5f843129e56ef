//! Syntax tree for a rendered reply.
//!
//! The tree is built fresh for every render and dropped after it is written
//! out as HTML. Text borrows from the input through [`CowStr`] wherever the
//! source slice can be used as-is.

use crate::span::Span;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// A parsed reply: blocks in reading order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document<'a> {
    pub blocks: Vec<Block<'a>>,
    /// Span covering the entire input.
    pub span: Span,
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    /// Fenced code block; content is never reinterpreted as markdown.
    CodeBlock(CodeBlock<'a>),
    /// `#`, `##` or `###` header.
    Heading(Heading<'a>),
    /// `---` or `***` on a line of its own.
    ThematicBreak(Span),
    /// Run of text lines between blank lines.
    Paragraph(Paragraph<'a>),
}

impl Block<'_> {
    pub fn span(&self) -> Span {
        match self {
            Block::CodeBlock(b) => b.span,
            Block::Heading(b) => b.span,
            Block::ThematicBreak(span) => *span,
            Block::Paragraph(b) => b.span,
        }
    }

    /// Short lowercase name of the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::CodeBlock(_) => "code_block",
            Block::Heading(_) => "heading",
            Block::ThematicBreak(_) => "thematic_break",
            Block::Paragraph(_) => "paragraph",
        }
    }
}

/// Fenced code block with an optional language hint.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock<'a> {
    /// Sanitized language token: ASCII letters and digits only.
    pub lang: Option<CowStr<'a>>,
    /// Raw content between the fences.
    pub content: CowStr<'a>,
    pub span: Span,
}

/// Header with level and inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    /// Header level (1-3).
    pub level: u8,
    pub content: Vec<Inline<'a>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph<'a> {
    pub content: Vec<Inline<'a>>,
    pub span: Span,
}

/// Inline-level nodes inside paragraphs and headers.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline<'a> {
    /// Plain text, escaped on output.
    Text(CowStr<'a>),
    /// `**x**` or `__x__`.
    Strong(Vec<Inline<'a>>),
    /// `*x*` or `_x_`.
    Emphasis(Vec<Inline<'a>>),
    /// `` `x` ``; content is never parsed for formatting.
    CodeSpan(CowStr<'a>),
    /// Single newline inside a paragraph.
    LineBreak,
}

impl Inline<'_> {
    /// Concatenated text content with all markup removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::CodeSpan(text) => out.push_str(text),
            Inline::Strong(children) | Inline::Emphasis(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
}
