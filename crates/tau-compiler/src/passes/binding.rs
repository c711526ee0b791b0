//! Binding: scope construction and identifier resolution.
//!
//! One `Global` scope holds the function names. Each function gets a `Func`
//! scope for its parameters, and each compound statement a `Local` scope
//! whose own `var` declarations are bound before any of its statements.
//! Uses are resolved by walking the scope chain at the point they occur, so
//! a function is visible from its own body (recursion) and from functions
//! declared after it, but not before it.
//!
//! This pass is the only place duplicate names are detected.

use bumpalo::Bump;
use log::{debug, trace};
use tau_core::{CompilationError, Scope, ScopeKind, Symbol, SymbolKind};
use tau_parser::ast::*;

use super::{Result, already_set};

/// Bind every name in `program`.
///
/// Scopes and symbols are allocated in `arena`, which must be the arena the
/// program lives in.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn bind<'ast>(program: &Program<'ast>, arena: &'ast Bump) -> Result<()> {
    debug!("binding {} function(s)", program.functions.len());

    let global: &'ast Scope<'ast> =
        arena.alloc(Scope::new(ScopeKind::Global, None, program.span, arena));
    program
        .set_scope(global)
        .map_err(|_| already_set(program.span, "global scope"))?;

    let mut binder = Binder {
        arena,
        scope: global,
    };
    for &func in program.functions {
        binder.bind_function(func)?;
    }
    Ok(())
}

/// Binding state: the arena and the innermost open scope.
struct Binder<'ast> {
    arena: &'ast Bump,
    scope: &'ast Scope<'ast>,
}

impl<'ast> Binder<'ast> {
    fn bind_function(&mut self, func: &'ast FuncDecl<'ast>) -> Result<()> {
        self.declare(&func.name, SymbolKind::Function)?;

        let params = self.open(ScopeKind::Func, func.span);
        func.set_scope(params)
            .map_err(|_| already_set(func.span, "parameter scope"))?;

        let outer = std::mem::replace(&mut self.scope, params);
        for &param in func.params {
            self.declare(&param.name, SymbolKind::Param)?;
        }
        self.bind_compound(func.body)?;
        self.scope = outer;

        debug!(
            "bound '{}': {} parameter(s)",
            func.name.name,
            func.params.len()
        );
        Ok(())
    }

    fn bind_compound(&mut self, block: &'ast CompoundStmt<'ast>) -> Result<()> {
        let local = self.open(ScopeKind::Local, block.span);
        block
            .set_scope(local)
            .map_err(|_| already_set(block.span, "block scope"))?;

        let outer = std::mem::replace(&mut self.scope, local);
        for &decl in block.decls {
            self.declare(&decl.name, SymbolKind::Var)?;
        }
        for stmt in block.stmts {
            self.bind_stmt(stmt)?;
        }
        self.scope = outer;
        Ok(())
    }

    fn bind_stmt(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        match *stmt {
            Stmt::Assign(assign) => {
                self.bind_expr(assign.target)?;
                self.bind_expr(assign.value)
            }
            Stmt::Call(call) => self.bind_call(call.call),
            Stmt::Compound(block) => self.bind_compound(block),
            Stmt::If(if_stmt) => {
                self.bind_expr(if_stmt.condition)?;
                self.bind_compound(if_stmt.then_branch)?;
                match if_stmt.else_branch {
                    Some(else_branch) => self.bind_compound(else_branch),
                    None => Ok(()),
                }
            }
            Stmt::Print(print) => self.bind_expr(print.value),
            Stmt::Return(ret) => match ret.value {
                Some(value) => self.bind_expr(value),
                None => Ok(()),
            },
            Stmt::While(while_stmt) => {
                self.bind_expr(while_stmt.condition)?;
                self.bind_compound(while_stmt.body)
            }
        }
    }

    fn bind_expr(&mut self, expr: Expr<'ast>) -> Result<()> {
        match expr {
            Expr::IntLiteral(_) | Expr::BoolLiteral(_) => Ok(()),
            Expr::Id(id) => self.resolve(&id.ident),
            Expr::ArrayCell(cell) => {
                self.resolve(&cell.array)?;
                self.bind_expr(cell.index)
            }
            Expr::Binary(binary) => {
                self.bind_expr(binary.left)?;
                self.bind_expr(binary.right)
            }
            Expr::Unary(unary) => self.bind_expr(unary.operand),
            Expr::Call(call) => self.bind_call(call),
        }
    }

    fn bind_call(&mut self, call: &'ast CallExpr<'ast>) -> Result<()> {
        self.resolve(&call.callee)?;
        for &arg in call.args {
            self.bind_expr(arg)?;
        }
        Ok(())
    }

    // =========================================================================
    // Scopes and symbols
    // =========================================================================

    /// Allocate a child of the current scope. The caller makes it current.
    fn open(&self, kind: ScopeKind, span: tau_core::Span) -> &'ast Scope<'ast> {
        self.arena
            .alloc(Scope::new(kind, Some(self.scope), span, self.arena))
    }

    /// Declare `ident` in the current scope and bind it to the new symbol.
    fn declare(&mut self, ident: &'ast Ident<'ast>, kind: SymbolKind) -> Result<()> {
        let symbol: &'ast Symbol<'ast> =
            self.arena
                .alloc(Symbol::new(ident.name, kind, self.scope, ident.span));

        if let Err(existing) = self.scope.declare(symbol) {
            trace!(
                "'{}' at {} clashes with declaration at {}",
                ident.name,
                ident.span,
                existing.span()
            );
            return Err(CompilationError::DuplicateIdentifier {
                name: ident.name.to_string(),
                span: ident.span,
            });
        }
        ident
            .bind(symbol)
            .map_err(|_| already_set(ident.span, "symbol"))?;

        trace!(
            "declared {:?} '{}' in {:?} scope",
            kind,
            ident.name,
            self.scope.kind()
        );
        Ok(())
    }

    /// Resolve a use of `ident` through the scope chain.
    fn resolve(&mut self, ident: &'ast Ident<'ast>) -> Result<()> {
        let symbol = self
            .scope
            .lookup(ident.name)
            .ok_or_else(|| CompilationError::UndefinedSymbol {
                name: ident.name.to_string(),
                span: ident.span,
            })?;
        ident
            .bind(symbol)
            .map_err(|_| already_set(ident.span, "symbol"))?;

        trace!(
            "resolved '{}' at {} to {:?} declared at {}",
            ident.name,
            ident.span,
            symbol.kind(),
            symbol.span()
        );
        Ok(())
    }
}
