//! Register assignment.
//!
//! Scratch registers `r1, r2, …` are handed out by a counter that restarts
//! at 1 for every statement. A leaf takes the counter's register; an
//! operator takes it, lets its operands take the ones above, then gives back
//! all but one, so every expression nets exactly one register and its value
//! sits in the lowest register its subtree used.
//!
//! The highest register used in a function is its register pool, saved and
//! restored by the function's prologue and epilogue.

use log::debug;
use tau_parser::ast::*;

use super::{Result, already_set};

/// Give every expression a register and every function its pool size.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn assign_registers(program: &Program<'_>) -> Result<()> {
    debug!("assigning registers in {} function(s)", program.functions.len());
    for &func in program.functions {
        let mut ctx = RegisterContext::new();
        ctx.compound(func.body)?;
        func.set_register_pool(ctx.max)
            .map_err(|_| already_set(func.span, "register pool"))?;
        debug!("'{}': register pool {}", func.name.name, ctx.max);
    }
    Ok(())
}

/// Per-function counter state.
struct RegisterContext {
    /// Next free register.
    current: u32,
    /// Highest register handed out so far, 0 if none.
    max: u32,
}

impl RegisterContext {
    fn new() -> Self {
        Self { current: 1, max: 0 }
    }

    fn reset(&mut self) {
        self.current = 1;
    }

    fn claim(&mut self) -> u32 {
        let reg = self.current;
        self.max = self.max.max(reg);
        self.current += 1;
        reg
    }

    fn release(&mut self) {
        self.current -= 1;
    }

    fn compound(&mut self, block: &CompoundStmt<'_>) -> Result<()> {
        for stmt in block.stmts {
            self.reset();
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match *stmt {
            // The value is computed before the target's address.
            Stmt::Assign(assign) => {
                self.expr(assign.value)?;
                self.expr(assign.target)
            }
            Stmt::Call(call) => self.call(call.call),
            Stmt::Compound(block) => self.compound(block),
            Stmt::If(if_stmt) => {
                self.expr(if_stmt.condition)?;
                self.compound(if_stmt.then_branch)?;
                match if_stmt.else_branch {
                    Some(else_branch) => self.compound(else_branch),
                    None => Ok(()),
                }
            }
            Stmt::Print(print) => self.expr(print.value),
            Stmt::Return(ret) => match ret.value {
                Some(value) => self.expr(value),
                None => Ok(()),
            },
            Stmt::While(while_stmt) => {
                self.expr(while_stmt.condition)?;
                self.compound(while_stmt.body)
            }
        }
    }

    fn expr(&mut self, expr: Expr<'_>) -> Result<()> {
        match expr {
            Expr::IntLiteral(_) | Expr::BoolLiteral(_) | Expr::Id(_) => {
                let reg = self.claim();
                set(expr, reg)
            }
            Expr::Binary(binary) => {
                set(expr, self.current)?;
                self.expr(binary.left)?;
                self.expr(binary.right)?;
                self.release();
                Ok(())
            }
            Expr::Unary(unary) => {
                set(expr, self.current)?;
                self.expr(unary.operand)
            }
            // Base address in this register, index in the next.
            Expr::ArrayCell(cell) => {
                let reg = self.claim();
                set(expr, reg)?;
                self.expr(cell.index)?;
                self.release();
                Ok(())
            }
            Expr::Call(call) => self.call(call),
        }
    }

    /// Arguments are stored as soon as they are computed, so each one
    /// reuses the call's register. The result is claimed afterwards.
    fn call(&mut self, call: &CallExpr<'_>) -> Result<()> {
        call.info
            .set_reg(self.current)
            .map_err(|_| already_set(call.span, "register"))?;
        for &arg in call.args {
            self.expr(arg)?;
            self.release();
        }
        self.claim();
        Ok(())
    }
}

fn set(expr: Expr<'_>, reg: u32) -> Result<()> {
    expr.info()
        .set_reg(reg)
        .map_err(|_| already_set(expr.span(), "register"))
}
