//! Text and JSON views of a parsed reply.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chatmd_core::{Block, Document, Inline, ParseErrors};
use serde::Serialize;

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    span: JsonSpan,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
struct JsonSpan {
    start: u32,
    end: u32,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        content: Vec<JsonInline<'a>>,
    },
    Paragraph {
        content: Vec<JsonInline<'a>>,
    },
    CodeBlock {
        lang: Option<&'a str>,
        content: &'a str,
    },
    ThematicBreak,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline<'a> {
    Text { content: &'a str },
    Emphasis { content: Vec<JsonInline<'a>> },
    Strong { content: Vec<JsonInline<'a>> },
    CodeSpan { content: &'a str },
    LineBreak,
}

pub fn document_json(doc: &Document) -> Result<String> {
    let json_doc = JsonDocument {
        span: JsonSpan {
            start: doc.span.start,
            end: doc.span.end,
        },
        blocks: doc.blocks.iter().map(convert_block).collect(),
    };
    let mut out = serde_json::to_string_pretty(&json_doc).context("failed to encode JSON")?;
    out.push('\n');
    Ok(out)
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            content: h.content.iter().map(convert_inline).collect(),
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            content: p.content.iter().map(convert_inline).collect(),
        },
        Block::CodeBlock(c) => JsonBlock::CodeBlock {
            lang: c.lang.as_deref(),
            content: &c.content,
        },
        Block::ThematicBreak(_) => JsonBlock::ThematicBreak,
    }
}

fn convert_inline<'a>(inline: &'a Inline) -> JsonInline<'a> {
    match inline {
        Inline::Text(t) => JsonInline::Text { content: t },
        Inline::Emphasis(children) => JsonInline::Emphasis {
            content: children.iter().map(convert_inline).collect(),
        },
        Inline::Strong(children) => JsonInline::Strong {
            content: children.iter().map(convert_inline).collect(),
        },
        Inline::CodeSpan(c) => JsonInline::CodeSpan { content: c },
        Inline::LineBreak => JsonInline::LineBreak,
    }
}

pub fn validation_report(errors: &ParseErrors, json: bool) -> Result<String> {
    if json {
        let entries: Vec<_> = errors
            .iter()
            .map(|e| {
                serde_json::json!({
                    "message": e.message,
                    "kind": e.kind.as_str(),
                    "span": e.span.map(|s| serde_json::json!({"start": s.start, "end": s.end})),
                    "recoverable": e.recoverable
                })
            })
            .collect();
        let report = serde_json::json!({"valid": errors.is_empty(), "errors": entries});
        return Ok(format!("{report}\n"));
    }

    let mut out = String::new();
    if errors.is_empty() {
        writeln!(out, "Valid: no diagnostics")?;
    } else {
        writeln!(out, "Degraded: {} diagnostic(s)", errors.len())?;
        for error in errors.iter() {
            writeln!(out, "  - [{}] {}", error.kind.as_str(), error)?;
        }
    }
    Ok(out)
}

// =============================================================================
// Text Output
// =============================================================================

pub fn document_summary(doc: &Document, verbose: bool) -> Result<String> {
    let mut out = String::new();
    if verbose {
        writeln!(out, "Span: {}..{}", doc.span.start, doc.span.end)?;
    }
    writeln!(out, "Blocks: {}", doc.blocks.len())?;
    for (i, block) in doc.blocks.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, describe_block(block))?;
        if verbose {
            write_block_detail(&mut out, block)?;
        }
    }
    Ok(out)
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {})", h.level),
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::CodeBlock(c) => match &c.lang {
            Some(lang) => format!("CodeBlock (lang: {lang})"),
            None => "CodeBlock".to_string(),
        },
        Block::ThematicBreak(_) => "ThematicBreak".to_string(),
    }
}

fn write_block_detail(out: &mut String, block: &Block) -> std::fmt::Result {
    let prefix = "      ";
    let span = block.span();
    writeln!(out, "{prefix}Span: {}..{}", span.start, span.end)?;

    match block {
        Block::Heading(h) => writeln!(out, "{prefix}Content: {}", format_inlines(&h.content)),
        Block::Paragraph(p) => writeln!(out, "{prefix}Content: {}", format_inlines(&p.content)),
        Block::CodeBlock(c) => {
            let preview: String = c.content.chars().take(60).collect();
            let ellipsis = if c.content.chars().count() > 60 { "..." } else { "" };
            writeln!(
                out,
                "{prefix}Content: {}{}",
                preview.replace('\n', "\\n"),
                ellipsis
            )
        }
        Block::ThematicBreak(_) => Ok(()),
    }
}

/// Re-serialize inlines with normalized markers.
fn format_inlines(inlines: &[Inline]) -> String {
    let mut result = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => result.push_str(t),
            Inline::Emphasis(children) => {
                result.push('*');
                result.push_str(&format_inlines(children));
                result.push('*');
            }
            Inline::Strong(children) => {
                result.push_str("**");
                result.push_str(&format_inlines(children));
                result.push_str("**");
            }
            Inline::CodeSpan(c) => {
                result.push('`');
                result.push_str(c);
                result.push('`');
            }
            Inline::LineBreak => result.push_str("\\n"),
        }
    }
    result
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub total_blocks: usize,
    pub headings: usize,
    pub paragraphs: usize,
    pub code_blocks: usize,
    pub rules: usize,
    pub strong: usize,
    pub emphasis: usize,
    pub code_spans: usize,
    pub line_breaks: usize,
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
}

impl DocumentStats {
    pub fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            total_blocks: doc.blocks.len(),
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        for block in &doc.blocks {
            match block {
                Block::Heading(h) => {
                    stats.headings += 1;
                    stats.count_inlines(&h.content);
                }
                Block::Paragraph(p) => {
                    stats.paragraphs += 1;
                    stats.count_inlines(&p.content);
                }
                Block::CodeBlock(_) => stats.code_blocks += 1,
                Block::ThematicBreak(_) => stats.rules += 1,
            }
        }
        stats
    }

    fn count_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Strong(children) => {
                    self.strong += 1;
                    self.count_inlines(children);
                }
                Inline::Emphasis(children) => {
                    self.emphasis += 1;
                    self.count_inlines(children);
                }
                Inline::CodeSpan(_) => self.code_spans += 1,
                Inline::LineBreak => self.line_breaks += 1,
                Inline::Text(_) => {}
            }
        }
    }

    pub fn report(&self, diagnostics: usize) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Reply Statistics")?;
        writeln!(out, "----------------")?;
        writeln!(out, "Blocks:")?;
        writeln!(out, "  Total:        {}", self.total_blocks)?;
        writeln!(out, "  Headings:     {}", self.headings)?;
        writeln!(out, "  Paragraphs:   {}", self.paragraphs)?;
        writeln!(out, "  Code blocks:  {}", self.code_blocks)?;
        writeln!(out, "  Rules:        {}", self.rules)?;
        writeln!(out)?;
        writeln!(out, "Inlines:")?;
        writeln!(out, "  Strong:       {}", self.strong)?;
        writeln!(out, "  Emphasis:     {}", self.emphasis)?;
        writeln!(out, "  Code spans:   {}", self.code_spans)?;
        writeln!(out, "  Line breaks:  {}", self.line_breaks)?;
        writeln!(out)?;
        writeln!(out, "Size:")?;
        writeln!(out, "  Characters:   {}", self.chars)?;
        writeln!(out, "  Words:        {}", self.words)?;
        writeln!(out, "  Lines:        {}", self.lines)?;
        writeln!(out)?;
        writeln!(out, "Diagnostics:    {diagnostics}")?;
        Ok(out)
    }
}
