//! Utility macros for the highlighter.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default rule handler for flat tokens
//!
//! These macros reduce boilerplate in the grammar table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$span` - The source span
/// * `$inside` - Optional nested tokens
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Keyword, Span::new(0, 4));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $span:expr) => {
        Token {
            kind: $kind,
            span: $span,
            inside: Vec::new(),
        }
    };
    ($kind:expr, $span:expr, $inside:expr) => {
        Token {
            kind: $kind,
            span: $span,
            inside: $inside,
        }
    };
}

/// Creates a default rule handler that emits one flat token covering the
/// whole match and advances the highlighter past it.
///
/// # Example
///
/// ```ignore
/// GrammarRule {
///     regex: Regex::new(r"[\[\](),]").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Punctuation),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |highlighter: &mut Highlighter, span: Span| {
            highlighter.push(MK_TOKEN!($kind, span));
            highlighter.advance_to(span.end);
        }
    };
}
