//! HTML escaping for text emitted by the renderer.
//!
//! Every piece of reply text passes through here exactly once on its way to
//! the output. The mapping is fixed:
//!
//! | char | entity   |
//! |------|----------|
//! | `&`  | `&amp;`  |
//! | `<`  | `&lt;`   |
//! | `>`  | `&gt;`   |
//! | `"`  | `&quot;` |
//! | `'`  | `&#39;`  |
//!
//! Escaping is not idempotent: `&amp;` becomes `&amp;amp;`.

use std::borrow::Cow;
use std::fmt;

use memchr::{memchr2, memchr3};

/// Text that is safe to place in HTML element content or a quoted attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedText<'a>(Cow<'a, str>);

impl<'a> EscapedText<'a> {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }

    /// True when the input needed no substitutions.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.0, Cow::Borrowed(_))
    }
}

impl fmt::Display for EscapedText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EscapedText<'_> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape `text`, borrowing it unchanged when it has nothing to escape.
///
/// ```rust
/// use chatmd_core::escape::escape_html;
///
/// assert_eq!(escape_html("a < b").as_str(), "a &lt; b");
/// assert!(escape_html("plain").is_borrowed());
/// ```
pub fn escape_html(text: &str) -> EscapedText<'_> {
    if find_special(text.as_bytes(), 0).is_none() {
        return EscapedText(Cow::Borrowed(text));
    }
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut out, text);
    EscapedText(Cow::Owned(out))
}

/// Append the escaped form of `text` to `out`.
pub fn push_escaped(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut last = 0;

    while let Some(pos) = find_special(bytes, last) {
        out.push_str(&text[last..pos]);
        out.push_str(match bytes[pos] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => "&#39;",
        });
        last = pos + 1;
    }

    out.push_str(&text[last..]);
}

/// Offset of the next byte that needs escaping at or after `from`.
#[inline(always)]
fn find_special(bytes: &[u8], from: usize) -> Option<usize> {
    let rest = &bytes[from..];
    let markup = memchr3(b'&', b'<', b'>', rest);
    let quotes = memchr2(b'"', b'\'', rest);

    match (markup, quotes) {
        (Some(a), Some(b)) => Some(from + a.min(b)),
        (Some(a), None) => Some(from + a),
        (None, Some(b)) => Some(from + b),
        (None, None) => None,
    }
}
