//! Pieces shared by every node family: identifiers and the write-once
//! annotation slots that the compiler passes fill in.

use std::cell::OnceCell;
use std::fmt;

use tau_core::{SemanticType, Span, Symbol};

/// A name as written in the source, either declared or referenced.
///
/// The binder attaches the [`Symbol`] it resolves to.
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
    symbol: OnceCell<&'ast Symbol<'ast>>,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self {
            name,
            span,
            symbol: OnceCell::new(),
        }
    }

    /// The resolved symbol, once binding has run.
    pub fn symbol(&self) -> Option<&'ast Symbol<'ast>> {
        self.symbol.get().copied()
    }

    /// Attach the resolved symbol. Fails with the rejected symbol if the
    /// identifier is already bound.
    pub fn bind(&self, symbol: &'ast Symbol<'ast>) -> Result<(), &'ast Symbol<'ast>> {
        self.symbol.set(symbol)
    }
}

impl fmt::Debug for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({:?} @ {:?}", self.name, self.span)?;
        if self.symbol.get().is_some() {
            write!(f, ", bound")?;
        }
        write!(f, ")")
    }
}

/// A write-once semantic type slot, carried by declarations and type nodes.
#[derive(Debug, Default)]
pub struct TypeSlot<'ast>(OnceCell<SemanticType<'ast>>);

impl<'ast> TypeSlot<'ast> {
    pub fn get(&self) -> Option<SemanticType<'ast>> {
        self.0.get().copied()
    }

    pub fn set(&self, ty: SemanticType<'ast>) -> Result<(), SemanticType<'ast>> {
        self.0.set(ty)
    }
}

/// Annotations on every expression node: its semantic type and the number
/// of the scratch register holding its value.
#[derive(Debug, Default)]
pub struct ExprInfo<'ast> {
    ty: TypeSlot<'ast>,
    reg: OnceCell<u32>,
}

impl<'ast> ExprInfo<'ast> {
    pub fn ty(&self) -> Option<SemanticType<'ast>> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: SemanticType<'ast>) -> Result<(), SemanticType<'ast>> {
        self.ty.set(ty)
    }

    /// Scratch register number, `n` for `r<n>`.
    pub fn reg(&self) -> Option<u32> {
        self.reg.get().copied()
    }

    pub fn set_reg(&self, reg: u32) -> Result<(), u32> {
        self.reg.set(reg)
    }
}
