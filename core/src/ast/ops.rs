//! Operator enumerations shared by expression nodes.
//!
//! Each operator has a canonical spelling (the name the parser emits) and a
//! source symbol used when printing trees.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 2] = [UnaryOp::Not, UnaryOp::Minus];

    /// Map a parser spelling to the operator; `None` when unrecognized.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "Not" => Some(UnaryOp::Not),
            "Minus" => Some(UnaryOp::Minus),
            _ => None,
        }
    }

    pub fn spelling(self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::Minus => "Minus",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Addition,
    Subtraction,
    Multiplication,
    Division,

    // Logical
    And,
    Or,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 12] = [
        BinaryOp::Addition,
        BinaryOp::Subtraction,
        BinaryOp::Multiplication,
        BinaryOp::Division,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::LessThan,
        BinaryOp::LessOrEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterOrEqual,
    ];

    /// Map a parser spelling to the operator; `None` when unrecognized.
    ///
    /// The parser historically spells the inclusive comparisons
    /// `LessorEqual` / `GreaterorEqual`; the camel-cased forms are accepted
    /// as well.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let op = match spelling {
            "Addition" => BinaryOp::Addition,
            "Subtraction" => BinaryOp::Subtraction,
            "Multiplication" => BinaryOp::Multiplication,
            "Division" => BinaryOp::Division,
            "And" => BinaryOp::And,
            "Or" => BinaryOp::Or,
            "Equal" => BinaryOp::Equal,
            "NotEqual" => BinaryOp::NotEqual,
            "LessThan" => BinaryOp::LessThan,
            "LessorEqual" | "LessOrEqual" => BinaryOp::LessOrEqual,
            "Greater" => BinaryOp::Greater,
            "GreaterorEqual" | "GreaterOrEqual" => BinaryOp::GreaterOrEqual,
            _ => return None,
        };
        Some(op)
    }

    pub fn spelling(self) -> &'static str {
        match self {
            BinaryOp::Addition => "Addition",
            BinaryOp::Subtraction => "Subtraction",
            BinaryOp::Multiplication => "Multiplication",
            BinaryOp::Division => "Division",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::Equal => "Equal",
            BinaryOp::NotEqual => "NotEqual",
            BinaryOp::LessThan => "LessThan",
            BinaryOp::LessOrEqual => "LessorEqual",
            BinaryOp::Greater => "Greater",
            BinaryOp::GreaterOrEqual => "GreaterorEqual",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Addition => "+",
            BinaryOp::Subtraction => "-",
            BinaryOp::Multiplication => "*",
            BinaryOp::Division => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterOrEqual => ">=",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Addition | BinaryOp::Subtraction | BinaryOp::Multiplication | BinaryOp::Division
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Comparison operators produce a boolean from two operands.
    pub fn is_comparison(self) -> bool {
        !self.is_arithmetic() && !self.is_logical()
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
