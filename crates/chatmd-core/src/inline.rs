//! Inline parser for paragraph and header text.
//!
//! Parsing runs in fixed stages over a flat token list:
//!
//! 1. Code spans are cut out first and become opaque leaves.
//! 2. `**` and then `__` pairs become [`Inline::Strong`].
//! 3. `*` and then `_` pairs become [`Inline::Emphasis`].
//!
//! A span built by an earlier pass is a single atom to every later pass: a
//! later pass may wrap it whole or run inside it, never split it. Delimiters
//! that never find a partner stay in the output as literal text.

use std::borrow::Cow;

use memchr::{memchr, memchr3};

use crate::ast::Inline;
use crate::lexer::normalize_newlines;

/// Parse the inline content of `text`.
///
/// ```rust
/// use chatmd_core::ast::Inline;
/// use chatmd_core::inline::parse_inlines;
///
/// let inlines = parse_inlines("**bold** `code`");
/// assert!(matches!(inlines[0], Inline::Strong(_)));
/// assert_eq!(inlines[2], Inline::CodeSpan("code".into()));
/// ```
pub fn parse_inlines(text: &str) -> Vec<Inline<'_>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut nodes = Tokenizer::new(text).tokenize();
    for pass in PASSES {
        nodes = pass.apply(nodes);
    }
    to_inlines(text, nodes)
}

/// Flat token, or a span already claimed by an emphasis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text { start: usize, end: usize },
    /// A single `*` or `_` character.
    Delim { ch: u8, at: usize },
    Newline,
    Code { start: usize, end: usize },
    Strong(Vec<Node>),
    Emphasis(Vec<Node>),
}

struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
    text_start: usize,
    nodes: Vec<Node>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            text_start: 0,
            nodes: Vec::with_capacity(16),
        }
    }

    fn tokenize(mut self) -> Vec<Node> {
        while let Some(pos) = self.find_next_special() {
            self.pos = pos;
            match self.bytes[pos] {
                b'`' => self.code_span(),
                b'\n' => {
                    // CRLF: the carriage return is part of the terminator
                    let end = if pos > self.text_start && self.bytes[pos - 1] == b'\r' {
                        pos - 1
                    } else {
                        pos
                    };
                    self.flush_text(end);
                    self.nodes.push(Node::Newline);
                    self.pos = pos + 1;
                    self.text_start = self.pos;
                }
                ch => {
                    self.flush_text(pos);
                    self.nodes.push(Node::Delim { ch, at: pos });
                    self.pos = pos + 1;
                    self.text_start = self.pos;
                }
            }
        }
        self.flush_text(self.bytes.len());
        self.nodes
    }

    #[inline(always)]
    fn find_next_special(&self) -> Option<usize> {
        let remaining = self.bytes.get(self.pos..)?;
        let marks = memchr3(b'*', b'_', b'`', remaining);
        let newline = memchr(b'\n', remaining);

        match (marks, newline) {
            (Some(a), Some(b)) => Some(self.pos + a.min(b)),
            (Some(a), None) => Some(self.pos + a),
            (None, Some(b)) => Some(self.pos + b),
            (None, None) => None,
        }
    }

    #[inline(always)]
    fn flush_text(&mut self, end: usize) {
        if self.text_start < end {
            self.nodes.push(Node::Text {
                start: self.text_start,
                end,
            });
        }
    }

    /// A lone backtick, non-empty content, a lone closing backtick.
    ///
    /// Longer backtick runs are literal text, so an unclosed fence line keeps
    /// its markers.
    fn code_span(&mut self) {
        let start = self.pos;
        let run = self.bytes[start..].iter().take_while(|&&b| b == b'`').count();

        if run == 1 {
            if let Some(offset) = memchr(b'`', &self.bytes[start + 1..]) {
                let close = start + 1 + offset;
                if self.bytes.get(close + 1) != Some(&b'`') {
                    self.flush_text(start);
                    self.nodes.push(Node::Code {
                        start: start + 1,
                        end: close,
                    });
                    self.pos = close + 1;
                    self.text_start = self.pos;
                    return;
                }
            }
        }

        // Literal backticks stay in the pending text run.
        self.pos = start + run;
    }
}

/// One delimiter pass over the node list.
#[derive(Debug, Clone, Copy)]
struct Pass {
    ch: u8,
    /// 2 for strong, 1 for emphasis.
    width: usize,
}

const PASSES: [Pass; 4] = [
    Pass { ch: b'*', width: 2 },
    Pass { ch: b'_', width: 2 },
    Pass { ch: b'*', width: 1 },
    Pass { ch: b'_', width: 1 },
];

impl Pass {
    fn apply(self, nodes: Vec<Node>) -> Vec<Node> {
        let nodes: Vec<Node> = nodes
            .into_iter()
            .map(|node| match node {
                Node::Strong(children) => Node::Strong(self.apply(children)),
                Node::Emphasis(children) => Node::Emphasis(self.apply(children)),
                other => other,
            })
            .collect();

        let spans = self.find_spans(&nodes);
        if spans.is_empty() {
            return nodes;
        }

        let mut out = Vec::with_capacity(nodes.len());
        let mut rest = nodes.into_iter();
        let mut pos = 0;

        for (open, close) in spans {
            out.extend(rest.by_ref().take(open - pos));
            let inner: Vec<Node> = rest
                .by_ref()
                .skip(self.width)
                .take(close - open - self.width)
                .collect();
            rest.by_ref().take(self.width).for_each(drop);
            out.push(self.wrap(inner));
            pos = close + self.width;
        }

        out.extend(rest);
        out
    }

    fn wrap(self, inner: Vec<Node>) -> Node {
        if self.width == 2 {
            Node::Strong(inner)
        } else {
            Node::Emphasis(inner)
        }
    }

    /// Non-overlapping `(opener, closer)` node indices, left to right.
    fn find_spans(self, nodes: &[Node]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut i = 0;

        while i < nodes.len() {
            if self.is_opener(nodes, i) {
                if let Some(close) = self.find_close(nodes, i) {
                    spans.push((i, close));
                    i = close + self.width;
                    continue;
                }
            }
            i += 1;
        }

        spans
    }

    fn is_delim(self, nodes: &[Node], i: usize) -> bool {
        matches!(nodes.get(i), Some(Node::Delim { ch, .. }) if *ch == self.ch)
    }

    fn is_opener(self, nodes: &[Node], i: usize) -> bool {
        (i..i + self.width).all(|j| self.is_delim(nodes, j))
    }

    /// First closing delimiter after a non-empty content run.
    ///
    /// Strong spans end at the line; emphasis spans may cross lines but stop
    /// at the first delimiter character of their kind.
    fn find_close(self, nodes: &[Node], open: usize) -> Option<usize> {
        let content_start = open + self.width;

        for k in content_start..nodes.len() {
            match &nodes[k] {
                Node::Newline if self.width == 2 => return None,
                Node::Delim { ch, .. } if *ch == self.ch => {
                    if self.width == 1 {
                        return (k > content_start).then_some(k);
                    }
                    if k > content_start && self.is_delim(nodes, k + 1) {
                        return Some(k);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

fn to_inlines(text: &str, nodes: Vec<Node>) -> Vec<Inline<'_>> {
    let mut sink = InlineSink {
        text,
        inlines: Vec::with_capacity(nodes.len()),
        pending: None,
    };

    for node in nodes {
        match node {
            Node::Text { start, end } => sink.text(start, end),
            Node::Delim { at, .. } => sink.text(at, at + 1),
            Node::Newline => sink.push(Inline::LineBreak),
            Node::Code { start, end } => {
                sink.push(Inline::CodeSpan(normalize_newlines(&text[start..end])))
            }
            Node::Strong(children) => sink.push(Inline::Strong(to_inlines(text, children))),
            Node::Emphasis(children) => sink.push(Inline::Emphasis(to_inlines(text, children))),
        }
    }

    sink.finish()
}

/// Collects inlines, merging adjacent text and leftover delimiters into one
/// borrowed slice.
struct InlineSink<'a> {
    text: &'a str,
    inlines: Vec<Inline<'a>>,
    pending: Option<(usize, usize)>,
}

impl<'a> InlineSink<'a> {
    fn text(&mut self, start: usize, end: usize) {
        match self.pending {
            Some((s, e)) if e == start => self.pending = Some((s, end)),
            _ => {
                self.flush();
                self.pending = Some((start, end));
            }
        }
    }

    fn push(&mut self, inline: Inline<'a>) {
        self.flush();
        self.inlines.push(inline);
    }

    fn flush(&mut self) {
        if let Some((s, e)) = self.pending.take() {
            self.inlines.push(Inline::Text(Cow::Borrowed(&self.text[s..e])));
        }
    }

    fn finish(mut self) -> Vec<Inline<'a>> {
        self.flush();
        self.inlines
    }
}
