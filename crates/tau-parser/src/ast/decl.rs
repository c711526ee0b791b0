//! Declaration AST nodes for Tau: the program, functions, parameters and
//! local variables.

use std::cell::OnceCell;
use std::fmt;

use tau_core::{Scope, SemanticType, Span};

use crate::ast::{CompoundStmt, Ident, TypeExpr, TypeSlot};

/// A whole translation unit: a list of functions.
pub struct Program<'ast> {
    pub functions: &'ast [&'ast FuncDecl<'ast>],
    pub span: Span,
    scope: OnceCell<&'ast Scope<'ast>>,
}

impl<'ast> Program<'ast> {
    pub fn new(functions: &'ast [&'ast FuncDecl<'ast>], span: Span) -> Self {
        Self {
            functions,
            span,
            scope: OnceCell::new(),
        }
    }

    /// The global scope, once binding has run.
    pub fn scope(&self) -> Option<&'ast Scope<'ast>> {
        self.scope.get().copied()
    }

    pub fn set_scope(&self, scope: &'ast Scope<'ast>) -> Result<(), &'ast Scope<'ast>> {
        self.scope.set(scope)
    }

    /// Find a function by name.
    pub fn function(&self, name: &str) -> Option<&'ast FuncDecl<'ast>> {
        self.functions.iter().copied().find(|f| f.name.name == name)
    }
}

impl fmt::Debug for Program<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("functions", &self.functions)
            .field("span", &self.span)
            .finish()
    }
}

/// `func name(params): ret { body }`
///
/// Besides its type, a function collects three annotations from the
/// compiler passes: its parameter scope (binding), its frame size (layout)
/// and the highest scratch register its body uses (register assignment).
pub struct FuncDecl<'ast> {
    pub name: Ident<'ast>,
    pub params: &'ast [&'ast Param<'ast>],
    pub ret: &'ast TypeExpr<'ast>,
    pub body: &'ast CompoundStmt<'ast>,
    pub span: Span,
    pub ty: TypeSlot<'ast>,
    scope: OnceCell<&'ast Scope<'ast>>,
    frame_size: OnceCell<i64>,
    register_pool: OnceCell<u32>,
}

impl<'ast> FuncDecl<'ast> {
    pub fn new(
        name: Ident<'ast>,
        params: &'ast [&'ast Param<'ast>],
        ret: &'ast TypeExpr<'ast>,
        body: &'ast CompoundStmt<'ast>,
        span: Span,
    ) -> Self {
        Self {
            name,
            params,
            ret,
            body,
            span,
            ty: TypeSlot::default(),
            scope: OnceCell::new(),
            frame_size: OnceCell::new(),
            register_pool: OnceCell::new(),
        }
    }

    /// The function's return type, once type checking has run.
    pub fn return_type(&self) -> Option<SemanticType<'ast>> {
        match self.ty.get()? {
            SemanticType::Func { ret, .. } => Some(*ret),
            _ => None,
        }
    }

    /// The parameter scope, once binding has run.
    pub fn scope(&self) -> Option<&'ast Scope<'ast>> {
        self.scope.get().copied()
    }

    pub fn set_scope(&self, scope: &'ast Scope<'ast>) -> Result<(), &'ast Scope<'ast>> {
        self.scope.set(scope)
    }

    /// Frame size in words (locals watermark plus the three header slots).
    pub fn frame_size(&self) -> Option<i64> {
        self.frame_size.get().copied()
    }

    pub fn set_frame_size(&self, size: i64) -> Result<(), i64> {
        self.frame_size.set(size)
    }

    /// Highest scratch register used by the body; 0 when none.
    pub fn register_pool(&self) -> Option<u32> {
        self.register_pool.get().copied()
    }

    pub fn set_register_pool(&self, pool: u32) -> Result<(), u32> {
        self.register_pool.set(pool)
    }
}

impl fmt::Debug for FuncDecl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncDecl")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .field("body", &self.body)
            .field("frame_size", &self.frame_size.get())
            .field("register_pool", &self.register_pool.get())
            .finish()
    }
}

/// `name: type` in a parameter list.
#[derive(Debug)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub type_expr: &'ast TypeExpr<'ast>,
    pub span: Span,
    pub ty: TypeSlot<'ast>,
}

impl<'ast> Param<'ast> {
    pub fn new(name: Ident<'ast>, type_expr: &'ast TypeExpr<'ast>, span: Span) -> Self {
        Self {
            name,
            type_expr,
            span,
            ty: TypeSlot::default(),
        }
    }
}

/// `var name: type`
#[derive(Debug)]
pub struct VarDecl<'ast> {
    pub name: Ident<'ast>,
    pub type_expr: &'ast TypeExpr<'ast>,
    pub span: Span,
    pub ty: TypeSlot<'ast>,
}

impl<'ast> VarDecl<'ast> {
    pub fn new(name: Ident<'ast>, type_expr: &'ast TypeExpr<'ast>, span: Span) -> Self {
        Self {
            name,
            type_expr,
            span,
            ty: TypeSlot::default(),
        }
    }
}
