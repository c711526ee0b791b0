//! Expression AST nodes for Tau.
//!
//! # Expression Precedence
//!
//! The parser uses Pratt parsing with the following precedence levels,
//! loosest first; every binary level is left-associative:
//! 1. `or`
//! 2. `and`
//! 3. Comparison (`==`, `!=`, `<`, `<=`, `>`, `>=`)
//! 4. Additive (`+`, `-`)
//! 5. Multiplicative (`*`, `/`)
//! 6. Prefix unary (`-`, `not`)
//!
//! Parentheses only group; they leave no node behind.

use tau_core::{SemanticType, Span};

use crate::ast::{BinaryOp, ExprInfo, Ident, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'ast> {
    /// `a[i]`
    ArrayCell(&'ast ArrayCellExpr<'ast>),
    /// `l op r`
    Binary(&'ast BinaryExpr<'ast>),
    /// `true` / `false`
    BoolLiteral(&'ast BoolLiteral<'ast>),
    /// `f(args)`
    Call(&'ast CallExpr<'ast>),
    /// A variable or parameter reference
    Id(&'ast IdExpr<'ast>),
    /// `42`
    IntLiteral(&'ast IntLiteral<'ast>),
    /// `op e`
    Unary(&'ast UnaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::ArrayCell(e) => e.span,
            Self::Binary(e) => e.span,
            Self::BoolLiteral(e) => e.span,
            Self::Call(e) => e.span,
            Self::Id(e) => e.ident.span,
            Self::IntLiteral(e) => e.span,
            Self::Unary(e) => e.span,
        }
    }

    /// The annotation slots of this expression.
    pub fn info(&self) -> &'ast ExprInfo<'ast> {
        match *self {
            Self::ArrayCell(e) => &e.info,
            Self::Binary(e) => &e.info,
            Self::BoolLiteral(e) => &e.info,
            Self::Call(e) => &e.info,
            Self::Id(e) => &e.info,
            Self::IntLiteral(e) => &e.info,
            Self::Unary(e) => &e.info,
        }
    }

    /// The type assigned by the type checker.
    pub fn ty(&self) -> Option<SemanticType<'ast>> {
        self.info().ty()
    }

    /// The scratch register assigned by register assignment.
    pub fn reg(&self) -> Option<u32> {
        self.info().reg()
    }
}

/// Integer literal.
#[derive(Debug)]
pub struct IntLiteral<'ast> {
    pub value: i64,
    pub span: Span,
    pub info: ExprInfo<'ast>,
}

/// Boolean literal.
#[derive(Debug)]
pub struct BoolLiteral<'ast> {
    pub value: bool,
    pub span: Span,
    pub info: ExprInfo<'ast>,
}

/// A use of a variable or parameter.
#[derive(Debug)]
pub struct IdExpr<'ast> {
    pub ident: Ident<'ast>,
    pub info: ExprInfo<'ast>,
}

/// Indexing into an array: `array[index]`.
#[derive(Debug)]
pub struct ArrayCellExpr<'ast> {
    pub array: Ident<'ast>,
    pub index: Expr<'ast>,
    pub span: Span,
    pub info: ExprInfo<'ast>,
}

#[derive(Debug)]
pub struct BinaryExpr<'ast> {
    pub op: BinaryOp,
    pub left: Expr<'ast>,
    pub right: Expr<'ast>,
    pub span: Span,
    pub info: ExprInfo<'ast>,
}

#[derive(Debug)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: Expr<'ast>,
    pub span: Span,
    pub info: ExprInfo<'ast>,
}

/// A function call. The callee is a plain name; there are no function values.
#[derive(Debug)]
pub struct CallExpr<'ast> {
    pub callee: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
    pub info: ExprInfo<'ast>,
}
