//! Source sanitizer.
//!
//! Turns editor text into the flat token stream the compiler module reads:
//! carriage returns are dropped, line breaks become an explicit ` \n ` marker
//! and operators are isolated by spaces. The transform is total and pure but
//! not idempotent.

pub mod sanitizer;
