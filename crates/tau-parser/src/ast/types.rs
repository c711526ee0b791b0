//! Type annotations as written in the source.

use tau_core::{SemanticType, Span};

use crate::ast::TypeSlot;

/// A written type: `int`, `bool`, `void`, `[N]int` or `[]int`.
#[derive(Debug)]
pub struct TypeExpr<'ast> {
    pub kind: TypeKind<'ast>,
    pub span: Span,
    /// Filled in by the type checker.
    pub ty: TypeSlot<'ast>,
}

#[derive(Debug, Clone, Copy)]
pub enum TypeKind<'ast> {
    Int,
    Bool,
    Void,
    /// `[size]element`; parameters leave the size out.
    Array {
        element: &'ast TypeExpr<'ast>,
        size: Option<usize>,
    },
}

impl<'ast> TypeExpr<'ast> {
    pub fn new(kind: TypeKind<'ast>, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: TypeSlot::default(),
        }
    }

    /// The semantic type, once type checking has run.
    pub fn semantic_type(&self) -> Option<SemanticType<'ast>> {
        self.ty.get()
    }
}
