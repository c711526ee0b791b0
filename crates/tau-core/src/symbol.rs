//! Lexical scopes and declared symbols.
//!
//! Scopes and symbols live in the same arena as the AST they describe, so
//! nodes can hold `&'ast Symbol<'ast>` directly. A scope only borrows its
//! parent for lookup. Symbol tables grow inside the arena as well, so
//! nothing here needs a destructor.
//!
//! The per-pass annotations on a [`Symbol`] (its type and its frame offset)
//! are write-once cells. Setting one twice is reported back to the caller,
//! which treats it as a broken pass invariant.

use std::cell::{OnceCell, RefCell};
use std::fmt;

use bumpalo::Bump;
use bumpalo::collections::Vec as BVec;

use crate::{SemanticType, Span};

/// What kind of scope a [`Scope`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The whole program; holds function names.
    Global,
    /// One function; holds its parameters.
    Func,
    /// One compound statement; holds its `var` declarations.
    Local,
}

/// What a symbol was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Param,
    Var,
}

/// A declared name.
///
/// Two declarations of the same text are two distinct symbols; compare
/// symbols with [`std::ptr::eq`], never by name.
pub struct Symbol<'ast> {
    name: &'ast str,
    kind: SymbolKind,
    scope: &'ast Scope<'ast>,
    span: Span,
    ty: OnceCell<SemanticType<'ast>>,
    offset: OnceCell<i64>,
}

impl<'ast> Symbol<'ast> {
    /// Create a symbol owned by `scope`. It is not declared until passed to
    /// [`Scope::declare`].
    pub fn new(name: &'ast str, kind: SymbolKind, scope: &'ast Scope<'ast>, span: Span) -> Self {
        Self {
            name,
            kind,
            scope,
            span,
            ty: OnceCell::new(),
            offset: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'ast str {
        self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// The scope this symbol was declared in.
    pub fn scope(&self) -> &'ast Scope<'ast> {
        self.scope
    }

    /// Where the symbol was declared.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The type, once the type checker has run.
    pub fn ty(&self) -> Option<SemanticType<'ast>> {
        self.ty.get().copied()
    }

    /// Record the symbol's type. Fails with the rejected type if one is
    /// already set.
    pub fn set_ty(&self, ty: SemanticType<'ast>) -> Result<(), SemanticType<'ast>> {
        self.ty.set(ty)
    }

    /// Frame-pointer-relative offset, once frame layout has run.
    pub fn offset(&self) -> Option<i64> {
        self.offset.get().copied()
    }

    /// Record the symbol's frame offset. Fails with the rejected offset if
    /// one is already set.
    pub fn set_offset(&self, offset: i64) -> Result<(), i64> {
        self.offset.set(offset)
    }
}

impl fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("scope", &self.scope.kind())
            .field("ty", &self.ty.get())
            .field("offset", &self.offset.get())
            .finish()
    }
}

/// A lexical scope: an insertion-ordered table of symbols plus a parent link.
///
/// Scopes hold a handful of names, so the table is a flat arena vector
/// searched linearly.
pub struct Scope<'ast> {
    kind: ScopeKind,
    parent: Option<&'ast Scope<'ast>>,
    span: Span,
    symtab: RefCell<BVec<'ast, &'ast Symbol<'ast>>>,
}

impl<'ast> Scope<'ast> {
    pub fn new(
        kind: ScopeKind,
        parent: Option<&'ast Scope<'ast>>,
        span: Span,
        arena: &'ast Bump,
    ) -> Self {
        Self {
            kind,
            parent,
            span,
            symtab: RefCell::new(BVec::new_in(arena)),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&'ast Scope<'ast>> {
        self.parent
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Add `symbol` to this scope.
    ///
    /// Names are unique within one scope: if the name is already present the
    /// table is left untouched and the earlier symbol is returned as the
    /// error.
    pub fn declare(&self, symbol: &'ast Symbol<'ast>) -> Result<(), &'ast Symbol<'ast>> {
        if let Some(existing) = self.lookup_local(symbol.name()) {
            return Err(existing);
        }
        self.symtab.borrow_mut().push(symbol);
        Ok(())
    }

    /// Find `name` in this scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&'ast Symbol<'ast>> {
        self.symtab
            .borrow()
            .iter()
            .find(|symbol| symbol.name() == name)
            .copied()
    }

    /// Find `name` in this scope or the nearest enclosing scope that has it.
    pub fn lookup(&self, name: &str) -> Option<&'ast Symbol<'ast>> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(symbol) = current.lookup_local(name) {
                return Some(symbol);
            }
            scope = current.parent;
        }
        None
    }

    /// Symbols of this scope in declaration order.
    pub fn symbols(&self) -> Vec<&'ast Symbol<'ast>> {
        self.symtab.borrow().to_vec()
    }

    pub fn len(&self) -> usize {
        self.symtab.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symtab.borrow().is_empty()
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("kind", &self.kind)
            .field(
                "symbols",
                &self.symtab.borrow().iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
