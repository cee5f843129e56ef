//! Line-based lexer for the block parser.
//!
//! Splits input into lines with `memchr` newline scanning. Lines borrow
//! directly from the input; a trailing `\r` is dropped so CRLF replies parse
//! the same as LF ones.

use std::borrow::Cow;

use crate::span::Span;
use memchr::memchr;

/// A single line from the input with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without the line terminator).
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past `text`, before any `\r\n`.
    pub end: usize,
    pub span: Span,
}

impl<'a> Line<'a> {
    /// Check if this line contains only spaces and tabs.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.bytes().all(|b| b == b' ' || b == b'\t')
    }

    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// True for a line whose trimmed text opens a code fence.
    #[inline]
    pub fn is_fence_open(&self) -> bool {
        self.trimmed().starts_with("```")
    }

    /// True for a line whose trimmed text is exactly a closing fence.
    #[inline]
    pub fn is_fence_close(&self) -> bool {
        self.trimmed() == "```"
    }

    /// True for `---`, `***` and longer runs of one of those characters,
    /// with nothing else on the line.
    #[inline]
    pub fn is_thematic_break(&self) -> bool {
        let bytes = self.text.as_bytes();
        match bytes.first() {
            Some(&c @ (b'-' | b'*')) => bytes.len() >= 3 && bytes.iter().all(|&b| b == c),
            _ => false,
        }
    }

    /// Number of leading `#` characters.
    #[inline]
    pub fn hash_run(&self) -> usize {
        self.text.bytes().take_while(|&b| b == b'#').count()
    }
}

/// Line-based lexer with peek/consume access.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    offset: usize,
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            peeked: None,
        }
    }

    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.offset >= self.bytes.len()
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    /// Skip blank lines and return the count skipped.
    #[inline]
    pub fn skip_blank_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.peek_line() {
            if !line.is_blank() {
                break;
            }
            self.next_line();
            count += 1;
        }
        count
    }

    /// Get a slice of the input by byte offsets.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        let text_end = if end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(Line {
            text: &self.input[start..text_end],
            start,
            end: text_end,
            span: Span::from_range(start, text_end),
        })
    }
}

/// Start offset of the last closing-fence line in `input`, if any.
///
/// A fence opened on a line starting before this offset has a closing line
/// somewhere after it.
pub fn last_fence_close(input: &str) -> Option<usize> {
    let mut lexer = Lexer::new(input);
    let mut last = None;
    while let Some(line) = lexer.next_line() {
        if line.is_fence_close() {
            last = Some(line.start);
        }
    }
    last
}

/// Turn CRLF terminators inside a multi-line slice into LF, keeping empty
/// lines. Borrows when there is nothing to change.
pub(crate) fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if !raw.contains("\r\n") {
        return Cow::Borrowed(raw);
    }
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    Cow::Owned(lines.join("\n"))
}
