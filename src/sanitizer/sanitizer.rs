use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// In-stream replacement for a line break: space, backslash, `n`, space.
pub const NEWLINE_MARKER: &str = " \\n ";

lazy_static! {
    // Arrows come first in the alternation so `-` and `=` never fire on their prefix.
    static ref OPERATOR_ISOLATION: Regex = Regex::new(r"->|=>|[+\-=*/()]").unwrap();
}

/// Normalizes raw editor input into the compiler's token stream.
///
/// The steps run in a fixed order, each on the output of the previous one:
///
/// 1. strip `\r`
/// 2. replace `\n` with [`NEWLINE_MARKER`]
/// 3. surround every operator with one space on each side
///
/// Applying it twice widens the padding around operators again.
pub fn sanitize(raw: &str) -> String {
    let stripped = raw.replace('\r', "");
    let flattened = stripped.replace('\n', NEWLINE_MARKER);

    OPERATOR_ISOLATION
        .replace_all(&flattened, |caps: &Captures| format!(" {} ", &caps[0]))
        .into_owned()
}
