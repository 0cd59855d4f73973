//! Highlighting grammar for Velvex source.
//!
//! This module classifies editor text into typed spans for presentation:
//!
//! - `Ignore[...]` comments and `Txt[...]` strings with nested tokens
//! - Reserved macro names, operators, punctuation and single-letter variables
//! - Plain runs for everything else, so spans always tile the input
//!
//! It is not a lexer for the compiler and never rejects input.

pub mod grammar;
pub mod tokens;

#[cfg(test)]
mod tests;
