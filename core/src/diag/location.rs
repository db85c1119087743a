//! Source locations attached to every AST node.
//!
//! A `Location` records the line and column at which the builder observed
//! the construct. Both components are one-based when produced by a lexer;
//! `(0, 0)` marks a synthesized node with no source position.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Location used for nodes the builder synthesizes.
    pub const fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl From<(u32, u32)> for Location {
    fn from((line, column): (u32, u32)) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
