//! HTML fragment writer.
//!
//! Blocks are written back to back with no separator and no document
//! wrapper. All text, including code, goes through
//! [`push_escaped`](crate::escape::push_escaped) exactly once.

use crate::ast::{Block, CodeBlock, Document, Inline};
use crate::escape::push_escaped;

/// Render a parsed document to an HTML fragment.
pub fn to_html(doc: &Document<'_>) -> String {
    let mut out = String::with_capacity(doc.span.len() as usize + doc.span.len() as usize / 4);
    push_html(&mut out, doc);
    out
}

/// Append the HTML for `doc` to `out`.
pub fn push_html(out: &mut String, doc: &Document<'_>) {
    for block in &doc.blocks {
        push_block(out, block);
    }
}

fn push_block(out: &mut String, block: &Block<'_>) {
    match block {
        Block::CodeBlock(code) => push_code_block(out, code),
        Block::Heading(heading) => {
            let level = char::from(b'0' + heading.level.clamp(1, 6));
            out.push_str("<h");
            out.push(level);
            out.push('>');
            push_inlines(out, &heading.content);
            out.push_str("</h");
            out.push(level);
            out.push('>');
        }
        Block::ThematicBreak(_) => out.push_str("<hr>"),
        Block::Paragraph(paragraph) => {
            out.push_str("<p>");
            push_inlines(out, &paragraph.content);
            out.push_str("</p>");
        }
    }
}

fn push_code_block(out: &mut String, code: &CodeBlock<'_>) {
    out.push_str("<pre><code");
    if let Some(lang) = &code.lang {
        // Alphanumeric when parsed; hand-built documents may carry anything.
        out.push_str(" class=\"language-");
        push_escaped(out, lang);
        out.push('"');
    }
    out.push('>');
    push_escaped(out, &code.content);
    out.push_str("</code></pre>");
}

fn push_inlines(out: &mut String, inlines: &[Inline<'_>]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => push_escaped(out, text),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                push_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                push_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::CodeSpan(code) => {
                out.push_str("<code>");
                push_escaped(out, code);
                out.push_str("</code>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}
