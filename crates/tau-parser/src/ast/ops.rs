//! Operator definitions for Tau expressions.
//!
//! Provides the binary and unary operator enums along with the binding
//! powers the Pratt parser climbs on.

use std::fmt;

use crate::lexer::TokenKind;

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    /// `or`
    Or,
    /// `and`
    And,

    // Comparison
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // Additive
    /// `+`
    Add,
    /// `-`
    Sub,

    // Multiplicative
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Get the binding power for this operator as `(left_bp, right_bp)`.
    ///
    /// Every binary operator is left-associative, so `right_bp = left_bp + 1`.
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            Or => (1, 2),
            And => (3, 4),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => (5, 6),
            Add | Sub => (7, 8),
            Mul | Div => (9, 10),
        }
    }

    /// Try to convert a token kind to a binary operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match token {
            Or => BinaryOp::Or,
            And => BinaryOp::And,
            Equal => BinaryOp::Equal,
            NotEqual => BinaryOp::NotEqual,
            Less => BinaryOp::Less,
            LessEqual => BinaryOp::LessEqual,
            Greater => BinaryOp::Greater,
            GreaterEqual => BinaryOp::GreaterEqual,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            _ => return None,
        })
    }

    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    /// `== != < <= > >=`
    pub fn is_comparison(&self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }

    /// `and or`
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn as_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            Or => "or",
            And => "and",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `not`
    Not,
}

impl UnaryOp {
    /// Binding power of every prefix operator; tighter than any binary one.
    pub const BINDING_POWER: u8 = 11;

    pub fn from_token(token: TokenKind) -> Option<Self> {
        match token {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
