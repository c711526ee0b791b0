//! Type checking: assigns a [`SemanticType`] to every declaration, type
//! annotation and expression, and enforces the type rules.
//!
//! | Construct | Rule |
//! |---|---|
//! | `+ - * /` | `int`, `int` → `int` |
//! | `< <= > >= == !=` | operands of the same variant → `bool` |
//! | `and or` | `bool`, `bool` → `bool` |
//! | `-e` / `not e` | `int` → `int` / `bool` → `bool` |
//! | `f(args)` | `f` is a function, argument count matches → return type |
//! | `a[i]` | `a` is an array, `i` is `int` → element type |
//! | `x = e` | same variant, never an array |
//! | `return [e]` | matches the enclosing function's return type |
//! | `print e` | `int` or `bool` |
//! | `if` / `while` | condition is `bool` |
//!
//! Argument types are not compared against parameter types.

use bumpalo::Bump;
use log::{debug, trace};
use tau_core::{CompilationError, SemanticType, SymbolKind};
use tau_parser::ast::*;

use super::{Result, already_set, missing};

/// Type check every function of `program`, in declaration order.
///
/// Array and function types are built in `arena`, which must be the arena
/// the program lives in.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn typecheck<'ast>(program: &Program<'ast>, arena: &'ast Bump) -> Result<()> {
    debug!("type checking {} function(s)", program.functions.len());
    let mut checker = TypeChecker { arena, func: None };
    for &func in program.functions {
        checker.check_function(func)?;
    }
    Ok(())
}

/// Type checking state: the arena for composite types and the function
/// whose body is being checked.
struct TypeChecker<'ast> {
    arena: &'ast Bump,
    func: Option<&'ast FuncDecl<'ast>>,
}

impl<'ast> TypeChecker<'ast> {
    fn check_function(&mut self, func: &'ast FuncDecl<'ast>) -> Result<()> {
        let mut params = Vec::with_capacity(func.params.len());
        for &param in func.params {
            let ty = self.resolve_type(param.type_expr)?;
            if ty.is_void() {
                return Err(CompilationError::type_mismatch(
                    param.span,
                    format!("parameter '{}' cannot be void", param.name.name),
                ));
            }
            param
                .ty
                .set(ty)
                .map_err(|_| already_set(param.span, "parameter type"))?;
            set_symbol_type(&param.name, ty)?;
            params.push(ty);
        }

        let ret = self.resolve_type(func.ret)?;
        if ret.is_array() {
            return Err(CompilationError::type_mismatch(
                func.ret.span,
                "functions cannot return arrays",
            ));
        }
        let ty = SemanticType::func(self.arena, &params, ret);
        trace!("'{}' : {}", func.name.name, ty);

        // The symbol is typed before the body so recursive calls check.
        func.ty
            .set(ty)
            .map_err(|_| already_set(func.span, "function type"))?;
        set_symbol_type(&func.name, ty)?;

        self.func = Some(func);
        self.check_compound(func.body)?;
        self.func = None;

        debug!("checked '{}'", func.name.name);
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn check_compound(&mut self, block: &'ast CompoundStmt<'ast>) -> Result<()> {
        for &decl in block.decls {
            let ty = self.resolve_type(decl.type_expr)?;
            match ty {
                SemanticType::Void => {
                    return Err(CompilationError::type_mismatch(
                        decl.span,
                        format!("variable '{}' cannot be void", decl.name.name),
                    ));
                }
                SemanticType::Array { size: None, .. } => {
                    return Err(CompilationError::type_mismatch(
                        decl.span,
                        format!("local array '{}' needs a size", decl.name.name),
                    ));
                }
                _ => {}
            }
            decl.ty
                .set(ty)
                .map_err(|_| already_set(decl.span, "variable type"))?;
            set_symbol_type(&decl.name, ty)?;
        }
        for stmt in block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        match *stmt {
            Stmt::Assign(assign) => {
                let target = self.check_expr(assign.target)?;
                let value = self.check_expr(assign.value)?;
                if target.is_array() {
                    return Err(CompilationError::type_mismatch(
                        assign.span,
                        "cannot assign to a whole array",
                    ));
                }
                if !target.same_variant(&value) {
                    return Err(CompilationError::type_mismatch(
                        assign.span,
                        format!("cannot assign {value} to {target}"),
                    ));
                }
                Ok(())
            }
            Stmt::Call(call) => self.check_call(call.call).map(|_| ()),
            Stmt::Compound(block) => self.check_compound(block),
            Stmt::If(if_stmt) => {
                self.check_condition(if_stmt.condition, "if")?;
                self.check_compound(if_stmt.then_branch)?;
                match if_stmt.else_branch {
                    Some(else_branch) => self.check_compound(else_branch),
                    None => Ok(()),
                }
            }
            Stmt::Print(print) => {
                let ty = self.check_expr(print.value)?;
                if ty.is_int() || ty.is_bool() {
                    Ok(())
                } else {
                    Err(CompilationError::type_mismatch(
                        print.span,
                        format!("cannot print a value of type {ty}"),
                    ))
                }
            }
            Stmt::Return(ret) => self.check_return(ret),
            Stmt::While(while_stmt) => {
                self.check_condition(while_stmt.condition, "while")?;
                self.check_compound(while_stmt.body)
            }
        }
    }

    fn check_condition(&mut self, condition: Expr<'ast>, what: &str) -> Result<()> {
        let ty = self.check_expr(condition)?;
        if ty.is_bool() {
            Ok(())
        } else {
            Err(CompilationError::type_mismatch(
                condition.span(),
                format!("{what} condition must be bool, found {ty}"),
            ))
        }
    }

    fn check_return(&mut self, ret: &'ast ReturnStmt<'ast>) -> Result<()> {
        let func = self.func.ok_or_else(|| missing(ret.span, "enclosing function"))?;
        ret.set_func(func)
            .map_err(|_| already_set(ret.span, "enclosing function"))?;
        let expected = func
            .return_type()
            .ok_or_else(|| missing(func.span, "function type"))?;

        match ret.value {
            None if expected.is_void() => Ok(()),
            None => Err(CompilationError::type_mismatch(
                ret.span,
                format!("'{}' must return a value of type {expected}", func.name.name),
            )),
            Some(value) => {
                let found = self.check_expr(value)?;
                if expected.is_void() {
                    Err(CompilationError::type_mismatch(
                        ret.span,
                        format!("'{}' returns void but a value is returned", func.name.name),
                    ))
                } else if found != expected {
                    Err(CompilationError::type_mismatch(
                        ret.span,
                        format!("expected return type {expected}, found {found}"),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Type `expr`, record the type on it and return a copy.
    fn check_expr(&mut self, expr: Expr<'ast>) -> Result<SemanticType<'ast>> {
        let ty = match expr {
            Expr::IntLiteral(_) => SemanticType::Int,
            Expr::BoolLiteral(_) => SemanticType::Bool,
            Expr::Id(id) => {
                let symbol = id
                    .ident
                    .symbol()
                    .ok_or_else(|| missing(id.ident.span, "symbol"))?;
                if symbol.kind() == SymbolKind::Function {
                    return Err(CompilationError::type_mismatch(
                        id.ident.span,
                        format!("function '{}' used as a value", id.ident.name),
                    ));
                }
                symbol_type(&id.ident)?
            }
            Expr::ArrayCell(cell) => self.check_array_cell(cell)?,
            Expr::Binary(binary) => self.check_binary(binary)?,
            Expr::Unary(unary) => {
                let operand = self.check_expr(unary.operand)?;
                let expected = match unary.op {
                    UnaryOp::Neg => SemanticType::Int,
                    UnaryOp::Not => SemanticType::Bool,
                };
                if operand != expected {
                    return Err(CompilationError::type_mismatch(
                        unary.span,
                        format!("'{}' expects {expected}, found {operand}", unary.op),
                    ));
                }
                expected
            }
            Expr::Call(call) => self.check_call(call)?,
        };

        expr.info()
            .set_ty(ty)
            .map_err(|_| already_set(expr.span(), "expression type"))?;
        Ok(ty)
    }

    fn check_binary(&mut self, binary: &'ast BinaryExpr<'ast>) -> Result<SemanticType<'ast>> {
        let left = self.check_expr(binary.left)?;
        let right = self.check_expr(binary.right)?;
        let op = binary.op;

        let operands_ok = if op.is_arithmetic() {
            left.is_int() && right.is_int()
        } else if op.is_logical() {
            left.is_bool() && right.is_bool()
        } else {
            left.same_variant(&right)
        };
        if !operands_ok {
            return Err(CompilationError::type_mismatch(
                binary.span,
                format!("invalid operands for '{op}': {left} and {right}"),
            ));
        }

        Ok(if op.is_arithmetic() {
            SemanticType::Int
        } else {
            SemanticType::Bool
        })
    }

    fn check_array_cell(&mut self, cell: &'ast ArrayCellExpr<'ast>) -> Result<SemanticType<'ast>> {
        let (element, size) = match symbol_type(&cell.array)? {
            SemanticType::Array { element, size } => (*element, size),
            other => {
                return Err(CompilationError::type_mismatch(
                    cell.array.span,
                    format!("'{}' has type {other} and cannot be indexed", cell.array.name),
                ));
            }
        };

        let index = self.check_expr(cell.index)?;
        if !index.is_int() {
            return Err(CompilationError::type_mismatch(
                cell.index.span(),
                format!("array index must be int, found {index}"),
            ));
        }
        if let (Some(value), Some(size)) = (constant_int(cell.index), size)
            && (value < 0 || value as u64 >= size as u64)
        {
            return Err(CompilationError::type_mismatch(
                cell.index.span(),
                format!("index {value} is out of range for '{}' of size {size}", cell.array.name),
            ));
        }
        Ok(element)
    }

    fn check_call(&mut self, call: &'ast CallExpr<'ast>) -> Result<SemanticType<'ast>> {
        let (arity, ret) = match symbol_type(&call.callee)? {
            SemanticType::Func { params, ret } => (params.len(), *ret),
            other => {
                return Err(CompilationError::type_mismatch(
                    call.callee.span,
                    format!("'{}' has type {other} and cannot be called", call.callee.name),
                ));
            }
        };

        if call.args.len() != arity {
            return Err(CompilationError::ArityMismatch {
                name: call.callee.name.to_string(),
                expected: arity,
                found: call.args.len(),
                span: call.span,
            });
        }
        for &arg in call.args {
            self.check_expr(arg)?;
        }
        Ok(ret)
    }

    /// Map a written type to its semantic type and record it on every node
    /// of the annotation.
    fn resolve_type(&self, type_expr: &'ast TypeExpr<'ast>) -> Result<SemanticType<'ast>> {
        let ty = match type_expr.kind {
            TypeKind::Int => SemanticType::Int,
            TypeKind::Bool => SemanticType::Bool,
            TypeKind::Void => SemanticType::Void,
            TypeKind::Array { element, size } => {
                let element_ty = self.resolve_type(element)?;
                if !element_ty.is_int() {
                    return Err(CompilationError::type_mismatch(
                        element.span,
                        format!("array elements must be int, found {element_ty}"),
                    ));
                }
                SemanticType::array(self.arena, element_ty, size)
            }
        };
        type_expr
            .ty
            .set(ty)
            .map_err(|_| already_set(type_expr.span, "type annotation"))?;
        Ok(ty)
    }
}

fn set_symbol_type<'ast>(ident: &Ident<'ast>, ty: SemanticType<'ast>) -> Result<()> {
    ident
        .symbol()
        .ok_or_else(|| missing(ident.span, "symbol"))?
        .set_ty(ty)
        .map_err(|_| already_set(ident.span, "symbol type"))
}

fn symbol_type<'ast>(ident: &Ident<'ast>) -> Result<SemanticType<'ast>> {
    ident
        .symbol()
        .ok_or_else(|| missing(ident.span, "symbol"))?
        .ty()
        .ok_or_else(|| missing(ident.span, "symbol type"))
}

/// The value of an integer constant index (`3` or `-3`).
fn constant_int(expr: Expr<'_>) -> Option<i64> {
    match expr {
        Expr::IntLiteral(lit) => Some(lit.value),
        Expr::Unary(unary) if unary.op == UnaryOp::Neg => constant_int(unary.operand).map(|v| -v),
        _ => None,
    }
}
