//! Integration tests for the reply parser

use chatmd_core::ast::CodeBlock;
use chatmd_core::inline::parse_inlines;
use chatmd_core::lexer::{last_fence_close, Lexer};
use chatmd_core::span::Span;
use chatmd_core::{Block, Inline, ParseErrorKind, Parser};
use pretty_assertions::assert_eq;

fn text(s: &str) -> Inline<'_> {
    Inline::Text(s.into())
}

// ============================================================================
// Block Structure
// ============================================================================

#[test]
fn test_block_kinds_in_order() {
    let input = "# T\n\npara\n\n---\n\n```\nc\n```";
    let doc = Parser::new().parse(input);

    let kinds: Vec<_> = doc.blocks.iter().map(Block::kind).collect();
    assert_eq!(
        kinds,
        ["heading", "paragraph", "thematic_break", "code_block"]
    );
    assert_eq!(doc.span, Span::new(0, input.len() as u32));
}

#[test]
fn test_heading_level_and_content() {
    let doc = Parser::new().parse("### Deploy *now*");

    match &doc.blocks[0] {
        Block::Heading(h) => {
            assert_eq!(h.level, 3);
            assert_eq!(
                h.content,
                vec![text("Deploy "), Inline::Emphasis(vec![text("now")])]
            );
        }
        other => panic!("Expected heading, got {:?}", other),
    }
}

#[test]
fn test_code_block_fields() {
    let input = "```rust\nfn main() {}\n```";
    let doc = Parser::new().parse(input);

    match &doc.blocks[0] {
        Block::CodeBlock(CodeBlock {
            lang,
            content,
            span,
        }) => {
            assert_eq!(lang.as_deref(), Some("rust"));
            assert_eq!(content, "fn main() {}");
            assert_eq!(*span, Span::new(0, input.len() as u32));
        }
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_paragraph_line_breaks() {
    let doc = Parser::new().parse("a\nb");

    match &doc.blocks[0] {
        Block::Paragraph(p) => {
            assert_eq!(p.content, vec![text("a"), Inline::LineBreak, text("b")]);
            assert_eq!(p.span, Span::new(0, 3));
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_thematic_break_span() {
    let doc = Parser::new().parse("x\n\n***");
    assert_eq!(doc.blocks[1], Block::ThematicBreak(Span::new(3, 6)));
}

#[test]
fn test_text_borrows_from_input() {
    let inlines = parse_inlines("plain words");
    match &inlines[0] {
        Inline::Text(std::borrow::Cow::Borrowed(s)) => assert_eq!(*s, "plain words"),
        other => panic!("Expected borrowed text, got {:?}", other),
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_span_from_range_saturates() {
    assert_eq!(Span::from_range(3, 9), Span::new(3, 9));

    let far = u32::MAX as usize + 5;
    assert_eq!(Span::from_range(far - 10, far), Span::new(u32::MAX - 5, u32::MAX));
    assert_eq!(Span::from_range(far, far + 1), Span::new(u32::MAX, u32::MAX));
}

#[test]
fn test_lexer_lines_carry_byte_offsets() {
    let input = "ab\r\n\r\n```\ncode\n```";
    let mut lexer = Lexer::new(input);

    let first = lexer.next_line().unwrap();
    assert_eq!((first.text, first.start, first.end), ("ab", 0, 2));
    let blank = lexer.next_line().unwrap();
    assert_eq!((blank.text, blank.start, blank.end), ("", 4, 4));
    let fence = lexer.next_line().unwrap();
    assert_eq!(fence.start, 6);
    assert_eq!(lexer.slice(fence.start, fence.end), "```");

    assert_eq!(last_fence_close(input), Some(input.len() - 3));
}

// ============================================================================
// Inline Structure
// ============================================================================

#[test]
fn test_inline_nesting() {
    assert_eq!(
        parse_inlines("*a **b** c*"),
        vec![Inline::Emphasis(vec![
            text("a "),
            Inline::Strong(vec![text("b")]),
            text(" c"),
        ])]
    );
}

#[test]
fn test_leftover_delimiters_merge_into_text() {
    assert_eq!(parse_inlines("a ** b"), vec![text("a ** b")]);
}

#[test]
fn test_code_span_leaf() {
    assert_eq!(
        parse_inlines("x `*y*` z"),
        vec![text("x "), Inline::CodeSpan("*y*".into()), text(" z")]
    );
}

#[test]
fn test_crossing_spans_stay_literal() {
    // The strong span claims `**a *b**` first; the lone `*` inside it and
    // the one after it cannot pair across its boundary.
    assert_eq!(
        parse_inlines("**a *b** c*"),
        vec![
            Inline::Strong(vec![text("a *b")]),
            text(" c*"),
        ]
    );
}

#[test]
fn test_plain_text_of_inline() {
    let inlines = parse_inlines("**a** `b`");
    let joined: String = inlines.iter().map(Inline::plain_text).collect();
    assert_eq!(joined, "a b");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_clean_input_has_no_diagnostics() {
    let result = Parser::new().parse_with_recovery("# ok\n\n```sh\nls\n```\n\n**fine**");
    assert!(result.is_ok());
}

#[test]
fn test_unclosed_fence_diagnostic() {
    let result = Parser::new().parse_with_recovery("intro\n\n```python\nprint(1)");

    assert_eq!(result.errors.len(), 1);
    let error = result.errors.iter().next().unwrap();
    assert_eq!(error.kind, ParseErrorKind::UnclosedDelimiter);
    assert_eq!(error.span, Some(Span::new(7, 16)));
    assert!(error.recoverable);
    assert!(matches!(result.document.blocks[1], Block::Paragraph(_)));
}

#[test]
fn test_deep_header_diagnostic() {
    let result = Parser::new().parse_with_recovery("#### Four\n\n###### Six");
    assert_eq!(result.errors.count_of(ParseErrorKind::InvalidSyntax), 2);
}

#[test]
fn test_language_tag_diagnostic() {
    let result = Parser::new().parse_with_recovery("```c++\nint x;\n```");

    assert_eq!(result.errors.count_of(ParseErrorKind::InvalidLanguageTag), 1);
    match &result.document.blocks[0] {
        Block::CodeBlock(code) => assert_eq!(code.lang, None),
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_diagnostic_display() {
    let result = Parser::new().parse_with_recovery("```\nx");
    let message = result.errors.iter().next().unwrap().to_string();
    assert_eq!(message, "unclosed code fence, rendered as text at bytes 0..3");
}

#[test]
fn test_parser_reuse_resets_diagnostics() {
    let mut parser = Parser::new();
    assert_eq!(parser.parse_with_recovery("```\nx").errors.len(), 1);
    assert!(parser.parse_with_recovery("fine").is_ok());
}
