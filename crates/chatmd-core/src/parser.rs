//! Block parser.
//!
//! Walks the input line by line and assigns each line to a fenced code
//! block, a header, a horizontal rule or a paragraph. Paragraph and header
//! text is handed to [`crate::inline::parse_inlines`]; code block content
//! never is. Parsing cannot fail. Anything outside the dialect degrades to
//! paragraph text and leaves a diagnostic behind.

use std::borrow::Cow;

use tracing::debug;

use crate::ast::{Block, CodeBlock, CowStr, Document, Heading, Paragraph};
use crate::error::{ParseError, ParseErrors};
use crate::inline::parse_inlines;
use crate::lexer::{last_fence_close, normalize_newlines, Lexer, Line};
use crate::span::Span;

/// Deepest header the dialect renders.
pub const MAX_HEADING_LEVEL: usize = 3;

/// A parsed document together with the diagnostics recorded on the way.
#[derive(Debug)]
pub struct ParseResult<'a> {
    pub document: Document<'a>,
    pub errors: ParseErrors,
}

impl<'a> ParseResult<'a> {
    /// True when the input stayed entirely within the dialect.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What a line starts, judged on the line alone plus fence closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Fence,
    Heading(u8),
    Rule,
    Text,
}

/// Reply parser. Holds only per-call state.
#[derive(Debug, Default)]
pub struct Parser {
    errors: ParseErrors,
    /// Start of the last closing fence line in the current input.
    last_fence_close: Option<usize>,
}

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the input, discarding diagnostics.
    #[inline]
    pub fn parse<'a>(&mut self, input: &'a str) -> Document<'a> {
        self.parse_with_recovery(input).document
    }

    /// Parse the input, returning the document and every diagnostic.
    pub fn parse_with_recovery<'a>(&mut self, input: &'a str) -> ParseResult<'a> {
        self.errors = ParseErrors::new();
        self.last_fence_close = last_fence_close(input);

        let mut lexer = Lexer::new(input);
        let blocks = self.parse_blocks(&mut lexer, input);

        ParseResult {
            document: Document {
                blocks,
                span: Span::from_range(0, input.len()),
            },
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_blocks<'a>(&mut self, lexer: &mut Lexer<'a>, input: &'a str) -> Vec<Block<'a>> {
        let mut blocks = Vec::with_capacity(16);

        while !lexer.is_eof() {
            lexer.skip_blank_lines();

            if lexer.is_eof() {
                break;
            }

            if let Some(block) = self.parse_block(lexer, input) {
                blocks.push(block);
            }
        }

        blocks
    }

    fn parse_block<'a>(&mut self, lexer: &mut Lexer<'a>, input: &'a str) -> Option<Block<'a>> {
        let kind = {
            let line = lexer.peek_line()?;
            self.classify(line)
        };

        match kind {
            LineKind::Fence => self.parse_code_block(lexer),
            LineKind::Heading(level) => Self::parse_heading(lexer, level),
            LineKind::Rule => lexer.next_line().map(|line| Block::ThematicBreak(line.span)),
            LineKind::Text => self.parse_paragraph(lexer, input),
        }
    }

    fn classify(&self, line: &Line<'_>) -> LineKind {
        if line.is_fence_open() && self.fence_closes(line) {
            return LineKind::Fence;
        }

        let level = line.hash_run();
        if (1..=MAX_HEADING_LEVEL).contains(&level) && line.text[level..].starts_with(' ') {
            return LineKind::Heading(level as u8);
        }

        if line.is_thematic_break() {
            return LineKind::Rule;
        }

        LineKind::Text
    }

    #[inline]
    fn fence_closes(&self, open: &Line<'_>) -> bool {
        matches!(self.last_fence_close, Some(close) if close > open.start)
    }

    fn parse_heading<'a>(lexer: &mut Lexer<'a>, level: u8) -> Option<Block<'a>> {
        let line = lexer.next_line()?;
        let text = line.text[level as usize + 1..].trim();

        Some(Block::Heading(Heading {
            level,
            content: parse_inlines(text),
            span: line.span,
        }))
    }

    fn parse_code_block<'a>(&mut self, lexer: &mut Lexer<'a>) -> Option<Block<'a>> {
        let open = lexer.next_line()?;
        let info = open.trimmed().trim_start_matches('`').trim();
        let lang = self.sanitize_lang(info, open.span);

        let mut content_range: Option<(usize, usize)> = None;
        let mut end_span = open.span;

        while let Some(line) = lexer.next_line() {
            end_span = line.span;
            if line.is_fence_close() {
                break;
            }
            content_range = Some(match content_range {
                Some((start, _)) => (start, line.end),
                None => (line.start, line.end),
            });
        }

        let content = match content_range {
            Some((start, end)) => normalize_newlines(lexer.slice(start, end)),
            None => Cow::Borrowed(""),
        };

        Some(Block::CodeBlock(CodeBlock {
            lang,
            content,
            span: open.span.to(end_span),
        }))
    }

    /// Keep the first word of the info string if it is plain ASCII letters
    /// and digits; anything else would be unsafe inside a class attribute.
    fn sanitize_lang<'a>(&mut self, info: &'a str, span: Span) -> Option<CowStr<'a>> {
        let tag = info.split_whitespace().next()?;

        if tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Some(Cow::Borrowed(tag));
        }

        debug!(offset = span.start, tag, "dropping fence language tag");
        self.errors.push(ParseError::invalid_language_tag(tag, Some(span)));
        None
    }

    fn parse_paragraph<'a>(&mut self, lexer: &mut Lexer<'a>, input: &'a str) -> Option<Block<'a>> {
        let mut first: Option<Line<'a>> = None;
        let mut last: Option<Line<'a>> = None;

        loop {
            let line = match lexer.peek_line() {
                Some(line) if !line.is_blank() && self.classify(line) == LineKind::Text => *line,
                _ => break,
            };
            lexer.next_line();

            self.note_degraded_line(&line);
            if first.is_none() {
                first = Some(line);
            }
            last = Some(line);
        }

        let (first, last) = (first?, last?);
        let text = &input[first.start..last.end];

        Some(Block::Paragraph(Paragraph {
            content: parse_inlines(text),
            span: first.span.to(last.span),
        }))
    }

    /// Record why a line that looks like block syntax became paragraph text.
    fn note_degraded_line(&mut self, line: &Line<'_>) {
        if line.is_fence_open() {
            debug!(offset = line.start, "unclosed code fence rendered as text");
            self.errors.push(ParseError::unclosed_fence(Some(line.span)));
            return;
        }

        let level = line.hash_run();
        if level > MAX_HEADING_LEVEL && line.text[level..].starts_with(' ') {
            debug!(offset = line.start, level, "header too deep rendered as text");
            self.errors.push(ParseError::header_too_deep(level, Some(line.span)));
        }
    }
}

