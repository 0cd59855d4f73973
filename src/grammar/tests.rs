//! Unit tests for the highlighting grammar.
//!
//! Covers marker tokens (comments and strings), keyword and operator
//! precedence, word boundaries and the highlight markup.

use super::{
    grammar::{highlight_html, tokenize},
    tokens::{is_keyword, Token, TokenKind},
};
use crate::Span;

fn significant(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|token| token.kind != TokenKind::Plain)
        .cloned()
        .collect()
}

fn kinds_and_text<'a>(source: &'a str, tokens: &[Token]) -> Vec<(TokenKind, &'a str)> {
    tokens
        .iter()
        .map(|token| (token.kind, token.text(source)))
        .collect()
}

#[test]
fn test_comment_is_greedy() {
    let source = "Ignore[anything with ] or [ inside]";
    let tokens = tokenize(source);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].span, Span::new(0, source.len()));
}

#[test]
fn test_comment_greedy_stops_at_line_end() {
    let source = "Ignore[a] x\ny]";
    let tokens = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].text(source), "Ignore[a]");
}

#[test]
fn test_comment_spans_lines_when_unclosed_on_first() {
    let source = "Ignore[a\nb] c";
    let tokens = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].text(source), "Ignore[a\nb]");
    assert_eq!(
        kinds_and_text(source, &significant(&tokens)[1..]),
        vec![(TokenKind::Variable, "c")]
    );
}

#[test]
fn test_unterminated_comment_runs_to_eof() {
    let source = "Ignore[never closed\nf(x)";
    let tokens = tokenize(source);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].span.end, source.len());
}

#[test]
fn test_string_inner_span_excludes_brackets() {
    let source = "Txt[hello]";
    let tokens = tokenize(source);

    assert_eq!(tokens.len(), 1);
    let string = &tokens[0];
    assert_eq!(string.kind, TokenKind::String);
    assert_eq!(string.span, Span::new(0, 10));

    assert_eq!(
        kinds_and_text(source, &string.inside),
        vec![
            (TokenKind::Punctuation, "["),
            (TokenKind::InnerText, "hello"),
            (TokenKind::Punctuation, "]"),
        ]
    );
    assert_eq!(
        string.inner(TokenKind::InnerText).map(|t| t.text(source)),
        Some("hello")
    );
}

#[test]
fn test_string_is_lazy() {
    let source = "Txt[a] + Txt[b]";
    let tokens = significant(&tokenize(source));

    assert_eq!(
        kinds_and_text(source, &tokens),
        vec![
            (TokenKind::String, "Txt[a]"),
            (TokenKind::Operator, "+"),
            (TokenKind::String, "Txt[b]"),
        ]
    );
}

#[test]
fn test_empty_and_unterminated_strings() {
    let source = "Txt[]";
    let tokens = tokenize(source);
    assert_eq!(
        kinds_and_text(source, &tokens[0].inside),
        vec![(TokenKind::Punctuation, "["), (TokenKind::Punctuation, "]")]
    );

    let source = "Txt[abc";
    let tokens = tokenize(source);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(
        kinds_and_text(source, &tokens[0].inside),
        vec![(TokenKind::Punctuation, "["), (TokenKind::InnerText, "abc")]
    );
}

#[test]
fn test_comment_wins_over_string() {
    let source = "Ignore[Txt[x]]";
    let tokens = tokenize(source);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Comment);
}

#[test]
fn test_keywords() {
    let source = "Frac Sqrt Omega Om Zeta __ Txt";
    let tokens = significant(&tokenize(source));

    assert_eq!(tokens.len(), 7);
    for token in &tokens {
        assert_eq!(token.kind, TokenKind::Keyword);
        assert!(is_keyword(token.text(source)));
    }
}

#[test]
fn test_keywords_are_case_sensitive_and_whole_words() {
    let source = "frac Fraction";
    let tokens = tokenize(source);

    assert_eq!(
        kinds_and_text(source, &tokens),
        vec![(TokenKind::Plain, "frac Fraction")]
    );
}

#[test]
fn test_arrows_are_single_operators() {
    let source = "a->b=>c";
    let tokens = tokenize(source);

    assert_eq!(
        kinds_and_text(source, &tokens),
        vec![
            (TokenKind::Variable, "a"),
            (TokenKind::Operator, "->"),
            (TokenKind::Variable, "b"),
            (TokenKind::Operator, "=>"),
            (TokenKind::Variable, "c"),
        ]
    );
}

#[test]
fn test_single_character_operators() {
    let source = "=-+*/^";
    let tokens = tokenize(source);

    assert_eq!(tokens.len(), 6);
    assert!(tokens.iter().all(|token| token.kind == TokenKind::Operator));
}

#[test]
fn test_punctuation_and_variables() {
    let source = "f(X,y)";
    let tokens = tokenize(source);

    assert_eq!(
        kinds_and_text(source, &tokens),
        vec![
            (TokenKind::Variable, "f"),
            (TokenKind::Punctuation, "("),
            (TokenKind::Variable, "X"),
            (TokenKind::Punctuation, ","),
            (TokenKind::Variable, "y"),
            (TokenKind::Punctuation, ")"),
        ]
    );
}

#[test]
fn test_word_boundary_uses_full_source() {
    let source = "ab";
    let tokens = tokenize(source);

    assert_eq!(kinds_and_text(source, &tokens), vec![(TokenKind::Plain, "ab")]);
}

#[test]
fn test_non_ascii_plain_text() {
    let source = "α+b";
    let tokens = tokenize(source);

    assert_eq!(
        kinds_and_text(source, &tokens),
        vec![
            (TokenKind::Plain, "α"),
            (TokenKind::Operator, "+"),
            (TokenKind::Variable, "b"),
        ]
    );
}

#[test]
fn test_spans_tile_the_source() {
    let source = "Ignore[Welcome]\nf(Frac[x][2]) = Pdiff[2][y][x,m]\n\nTxt[Hello World!] 12 -> ∞";
    let tokens = tokenize(source);

    let mut cursor = 0;
    for token in &tokens {
        assert_eq!(token.span.start, cursor);
        cursor = token.span.end;
    }
    assert_eq!(cursor, source.len());

    let rebuilt: String = tokens.iter().map(|token| token.text(source)).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_empty_source() {
    assert!(tokenize("").is_empty());
    assert_eq!(highlight_html(""), "");
}

#[test]
fn test_highlight_html() {
    let html = highlight_html("Sqrt[x] <");

    assert_eq!(
        html,
        "<span class=\"token keyword\">Sqrt</span>\
         <span class=\"token punctuation\">[</span>\
         <span class=\"token variable\">x</span>\
         <span class=\"token punctuation\">]</span> &lt;"
    );
}

#[test]
fn test_highlight_html_nested_string() {
    let html = highlight_html("Txt[<b>]");

    assert_eq!(
        html,
        "<span class=\"token string\">Txt\
         <span class=\"token punctuation\">[</span>\
         <span class=\"token inner-text\">&lt;b&gt;</span>\
         <span class=\"token punctuation\">]</span></span>"
    );
}

#[test]
fn test_large_input_tokenizes_in_linear_time() {
    let plain = "9 ".repeat(40_000);
    let mixed = "a+1 ".repeat(20_000);

    let start = std::time::Instant::now();
    let plain_tokens = tokenize(&plain);
    let mixed_tokens = tokenize(&mixed);
    let elapsed = start.elapsed();

    assert_eq!(
        plain_tokens,
        vec![Token {
            kind: TokenKind::Plain,
            span: Span::new(0, plain.len()),
            inside: vec![],
        }]
    );
    assert_eq!(mixed_tokens.len(), 60_000);
    assert_eq!(
        kinds_and_text(&mixed, &mixed_tokens[..3]),
        vec![
            (TokenKind::Variable, "a"),
            (TokenKind::Operator, "+"),
            (TokenKind::Plain, "1 "),
        ]
    );
    assert!(
        elapsed < std::time::Duration::from_secs(5),
        "tokenizing 160 KB took {:?}",
        elapsed
    );
}
