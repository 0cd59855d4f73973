#![allow(clippy::module_inception)]

pub mod bridge;
pub mod config;
pub mod console;
pub mod errors;
pub mod grammar;
pub mod macros;
pub mod sanitizer;

extern crate regex;

/// Byte range into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Line numbers for the editor gutter, one per `\n`-separated line.
pub fn line_numbers(source: &str) -> Vec<usize> {
    (1..=source.split('\n').count()).collect()
}
