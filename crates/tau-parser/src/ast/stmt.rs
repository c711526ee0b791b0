//! Statement AST nodes for Tau.

use std::cell::OnceCell;
use std::fmt;

use tau_core::{Scope, Span};

use crate::ast::{CallExpr, Expr, FuncDecl, VarDecl};

/// A statement.
#[derive(Debug, Clone, Copy)]
pub enum Stmt<'ast> {
    /// `target = value`
    Assign(&'ast AssignStmt<'ast>),
    /// `call f(args)`
    Call(&'ast CallStmt<'ast>),
    /// `{ ... }`
    Compound(&'ast CompoundStmt<'ast>),
    /// `if cond { } else { }`
    If(&'ast IfStmt<'ast>),
    /// `print e`
    Print(&'ast PrintStmt<'ast>),
    /// `return [e]`
    Return(&'ast ReturnStmt<'ast>),
    /// `while cond { }`
    While(&'ast WhileStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Assign(s) => s.span,
            Self::Call(s) => s.span,
            Self::Compound(s) => s.span,
            Self::If(s) => s.span,
            Self::Print(s) => s.span,
            Self::Return(s) => s.span,
            Self::While(s) => s.span,
        }
    }
}

/// Assignment. The target is an [`Expr::Id`] or an [`Expr::ArrayCell`].
#[derive(Debug)]
pub struct AssignStmt<'ast> {
    pub target: Expr<'ast>,
    pub value: Expr<'ast>,
    pub span: Span,
}

/// A call whose result is discarded.
#[derive(Debug)]
pub struct CallStmt<'ast> {
    pub call: &'ast CallExpr<'ast>,
    pub span: Span,
}

/// A block: its own declarations, then its statements.
///
/// The binder opens one local scope per block and records it here.
pub struct CompoundStmt<'ast> {
    pub decls: &'ast [&'ast VarDecl<'ast>],
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
    scope: OnceCell<&'ast Scope<'ast>>,
}

impl<'ast> CompoundStmt<'ast> {
    pub fn new(decls: &'ast [&'ast VarDecl<'ast>], stmts: &'ast [Stmt<'ast>], span: Span) -> Self {
        Self {
            decls,
            stmts,
            span,
            scope: OnceCell::new(),
        }
    }

    /// The block's local scope, once binding has run.
    pub fn scope(&self) -> Option<&'ast Scope<'ast>> {
        self.scope.get().copied()
    }

    pub fn set_scope(&self, scope: &'ast Scope<'ast>) -> Result<(), &'ast Scope<'ast>> {
        self.scope.set(scope)
    }
}

impl fmt::Debug for CompoundStmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundStmt")
            .field("decls", &self.decls)
            .field("stmts", &self.stmts)
            .field("span", &self.span)
            .finish()
    }
}

#[derive(Debug)]
pub struct IfStmt<'ast> {
    pub condition: Expr<'ast>,
    pub then_branch: &'ast CompoundStmt<'ast>,
    pub else_branch: Option<&'ast CompoundStmt<'ast>>,
    pub span: Span,
}

#[derive(Debug)]
pub struct PrintStmt<'ast> {
    pub value: Expr<'ast>,
    pub span: Span,
}

/// `return` with an optional value.
///
/// The type checker records the function the statement returns from, which
/// codegen needs for the epilogue label.
pub struct ReturnStmt<'ast> {
    pub value: Option<Expr<'ast>>,
    pub span: Span,
    func: OnceCell<&'ast FuncDecl<'ast>>,
}

impl<'ast> ReturnStmt<'ast> {
    pub fn new(value: Option<Expr<'ast>>, span: Span) -> Self {
        Self {
            value,
            span,
            func: OnceCell::new(),
        }
    }

    /// The enclosing function, once type checking has run.
    pub fn func(&self) -> Option<&'ast FuncDecl<'ast>> {
        self.func.get().copied()
    }

    pub fn set_func(&self, func: &'ast FuncDecl<'ast>) -> Result<(), &'ast FuncDecl<'ast>> {
        self.func.set(func)
    }
}

impl fmt::Debug for ReturnStmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The enclosing function contains this statement; print only its name.
        f.debug_struct("ReturnStmt")
            .field("value", &self.value)
            .field("span", &self.span)
            .field("func", &self.func.get().map(|func| func.name.name))
            .finish()
    }
}

#[derive(Debug)]
pub struct WhileStmt<'ast> {
    pub condition: Expr<'ast>,
    pub body: &'ast CompoundStmt<'ast>,
    pub span: Span,
}
