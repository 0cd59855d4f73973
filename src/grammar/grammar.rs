use lazy_static::lazy_static;
use regex::Regex;

use crate::{Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, KEYWORDS};

pub const COMMENT_MARKER: &str = "Ignore";
pub const STRING_MARKER: &str = "Txt";

pub type RuleHandler = fn(&mut Highlighter, Span);

#[derive(Clone)]
pub struct GrammarRule {
    regex: Regex,
    handler: RuleHandler,
}

lazy_static! {
    /// Rules in precedence order, the first rule matching at the cursor wins.
    static ref RULES: Vec<GrammarRule> = vec![
        // Greedy to the last `]` on the line, else the nearest `]` further on, else EOF.
        GrammarRule { regex: Regex::new(r"Ignore\[(?:[^\n]*\]|[^\]]*\]|[\s\S]*)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comment) },
        GrammarRule { regex: Regex::new(r"Txt\[(?:[^\]]*\]|[\s\S]*)").unwrap(), handler: string_handler },
        GrammarRule { regex: Regex::new(&keyword_pattern()).unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Keyword) },
        GrammarRule { regex: Regex::new(r"->|=>|[=\-+*/^]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Operator) },
        GrammarRule { regex: Regex::new(r"[\[\](),]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Punctuation) },
        GrammarRule { regex: Regex::new(r"(?i)\b[a-z]\b").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Variable) },
    ];
}

fn keyword_pattern() -> String {
    let alternatives = KEYWORDS
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<String>>()
        .join("|");

    format!(r"\b(?:{})\b", alternatives)
}

pub struct Highlighter<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    plain_start: Option<usize>,
}

impl<'a> Highlighter<'a> {
    pub fn new(source: &'a str) -> Highlighter<'a> {
        Highlighter {
            source,
            tokens: vec![],
            pos: 0,
            plain_start: None,
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn advance_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_char(&mut self) {
        if self.plain_start.is_none() {
            self.plain_start = Some(self.pos);
        }

        let width = self.source[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos += width;
    }

    fn flush_plain(&mut self) {
        if let Some(start) = self.plain_start.take() {
            self.tokens
                .push(MK_TOKEN!(TokenKind::Plain, Span::new(start, self.pos)));
        }
    }
}

fn string_handler(highlighter: &mut Highlighter, span: Span) {
    let open = span.start + STRING_MARKER.len();
    let closed = span.slice(highlighter.source).ends_with(']');
    let inner_end = if closed { span.end - 1 } else { span.end };

    let mut inside = vec![MK_TOKEN!(TokenKind::Punctuation, Span::new(open, open + 1))];
    if inner_end > open + 1 {
        inside.push(MK_TOKEN!(TokenKind::InnerText, Span::new(open + 1, inner_end)));
    }
    if closed {
        inside.push(MK_TOKEN!(TokenKind::Punctuation, Span::new(inner_end, span.end)));
    }

    highlighter.push(MK_TOKEN!(TokenKind::String, span, inside));
    highlighter.advance_to(span.end);
}

fn next_match(rule: &GrammarRule, source: &str, from: usize) -> Option<Span> {
    rule.regex
        .find_at(source, from)
        .map(|found| Span::new(found.start(), found.end()))
}

/// Classifies `source` into tokens whose spans tile the whole input.
///
/// Rules are tried in precedence order at the cursor. Word boundaries are
/// evaluated against the full source, so `b` in `ab` is not a variable.
/// Each rule's next match is kept until the cursor passes its start, so
/// every rule scans the input about once.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut highlighter = Highlighter::new(source);
    let mut upcoming: Vec<Option<Span>> = RULES
        .iter()
        .map(|rule| next_match(rule, source, 0))
        .collect();

    while !highlighter.at_eof() {
        let pos = highlighter.pos;
        let mut matched = None;

        for (rule, next) in RULES.iter().zip(upcoming.iter_mut()) {
            if let Some(span) = *next {
                if span.start < pos {
                    *next = next_match(rule, source, pos);
                }
            }

            if let Some(span) = *next {
                if span.start == pos && !span.is_empty() {
                    matched = Some((rule.handler, span));
                    break;
                }
            }
        }

        match matched {
            Some((handler, span)) => {
                highlighter.flush_plain();
                handler(&mut highlighter, span);
            }
            None => highlighter.skip_char(),
        }
    }

    highlighter.flush_plain();
    highlighter.tokens
}

/// Renders `source` as highlight markup, one
/// `<span class="token KIND">` per classified token.
pub fn highlight_html(source: &str) -> String {
    let tokens = tokenize(source);
    let mut out = String::with_capacity(source.len() * 2);
    render_tokens(source, &tokens, Span::new(0, source.len()), &mut out);
    out
}

fn render_tokens(source: &str, tokens: &[Token], within: Span, out: &mut String) {
    let mut cursor = within.start;

    for token in tokens {
        if token.span.start > cursor {
            escape_into(&source[cursor..token.span.start], out);
        }

        if token.kind == TokenKind::Plain {
            escape_into(token.text(source), out);
        } else {
            out.push_str("<span class=\"token ");
            out.push_str(token.kind.class_name());
            out.push_str("\">");
            if token.inside.is_empty() {
                escape_into(token.text(source), out);
            } else {
                render_tokens(source, &token.inside, token.span, out);
            }
            out.push_str("</span>");
        }

        cursor = token.span.end;
    }

    if within.end > cursor {
        escape_into(&source[cursor..within.end], out);
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
