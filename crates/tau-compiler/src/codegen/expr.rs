//! Expression lowering.
//!
//! `rvalue` leaves the value of an expression in its register; `lvalue`
//! leaves the address of an assignable expression there instead.

use tau_core::{CompilationError, Symbol, SymbolKind};
use tau_parser::ast::*;

use super::{CodeGenerator, Result};
use crate::bytecode::{Instruction, Reg};
use crate::passes::missing;

impl CodeGenerator {
    pub(super) fn rvalue(&mut self, expr: Expr<'_>) -> Result<()> {
        let dst = reg(expr)?;
        match expr {
            Expr::IntLiteral(lit) => self.emit(Instruction::Immediate(dst, lit.value)),
            Expr::BoolLiteral(lit) => self.emit(Instruction::Immediate(dst, lit.value as i64)),
            Expr::Id(id) => {
                let symbol = symbol(&id.ident)?;
                self.frame_address(dst, offset(symbol, &id.ident)?);
                // A local array in value position stands for its address.
                if !is_local_array(symbol) {
                    self.emit(Instruction::Load(dst, dst));
                }
            }
            Expr::ArrayCell(_) => {
                self.lvalue(expr)?;
                self.emit(Instruction::Load(dst, dst));
            }
            Expr::Binary(binary) => match binary.op {
                BinaryOp::And => self.and_value(binary, dst)?,
                BinaryOp::Or => self.or_value(binary, dst)?,
                op => {
                    self.rvalue(binary.left)?;
                    self.rvalue(binary.right)?;
                    let (lhs, rhs) = (reg(binary.left)?, reg(binary.right)?);
                    let instruction = operator(op, dst, lhs, rhs).ok_or_else(|| {
                        CompilationError::internal(binary.span, "no instruction for operator")
                    })?;
                    self.emit(instruction);
                }
            },
            Expr::Unary(unary) => {
                self.rvalue(unary.operand)?;
                let src = reg(unary.operand)?;
                self.emit(match unary.op {
                    UnaryOp::Neg => Instruction::Sub(dst, Reg::Zero, src),
                    UnaryOp::Not => Instruction::Not(dst, src),
                });
            }
            Expr::Call(call) => self.call(call)?,
        }
        Ok(())
    }

    pub(super) fn lvalue(&mut self, expr: Expr<'_>) -> Result<()> {
        let dst = reg(expr)?;
        match expr {
            Expr::Id(id) => {
                let symbol = symbol(&id.ident)?;
                self.frame_address(dst, offset(symbol, &id.ident)?);
            }
            Expr::ArrayCell(cell) => {
                let symbol = symbol(&cell.array)?;
                self.frame_address(dst, offset(symbol, &cell.array)?);
                // A parameter slot holds the caller's base address.
                if symbol.kind() == SymbolKind::Param {
                    self.emit(Instruction::Load(dst, dst));
                }
                self.rvalue(cell.index)?;
                self.emit(Instruction::Add(dst, dst, reg(cell.index)?));
            }
            _ => {
                return Err(CompilationError::internal(
                    expr.span(),
                    "expression is not assignable",
                ));
            }
        }
        Ok(())
    }

    /// Push the argument and return slots, call, fetch the result into the
    /// call's register and pop the slots again.
    pub(super) fn call(&mut self, call: &CallExpr<'_>) -> Result<()> {
        let dst = call
            .info
            .reg()
            .map(Reg::Scratch)
            .ok_or_else(|| missing(call.span, "register"))?;
        let slots = call.args.len() as i64 + 1;

        self.emit(Instruction::AddImmediate(Reg::Sp, Reg::Sp, slots));
        for (index, &arg) in call.args.iter().enumerate() {
            self.rvalue(arg)?;
            self.emit(Instruction::AddImmediate(Reg::Curr, Reg::Sp, -2 - index as i64));
            self.emit(Instruction::Store(Reg::Curr, reg(arg)?));
        }
        self.emit(Instruction::Call(call.callee.name.to_string()));
        self.emit(Instruction::AddImmediate(Reg::Sp2, Reg::Sp, -1));
        self.emit(Instruction::Load(dst, Reg::Sp2));
        self.emit(Instruction::AddImmediate(Reg::Sp, Reg::Sp, -slots));
        Ok(())
    }

    // =========================================================================
    // Short-circuit values
    // =========================================================================

    fn and_value(&mut self, binary: &BinaryExpr<'_>, dst: Reg) -> Result<()> {
        let n = self.next_label();
        let (on_false, exit) = (format!("AND_FALSE_{n}"), format!("AND_EXIT_{n}"));

        self.rvalue(binary.left)?;
        self.emit(Instruction::JumpIfZero(reg(binary.left)?, on_false.clone()));
        self.rvalue(binary.right)?;
        self.emit(Instruction::JumpIfZero(reg(binary.right)?, on_false.clone()));
        self.emit(Instruction::Immediate(dst, 1));
        self.emit(Instruction::Jump(exit.clone()));
        self.emit(Instruction::Label(on_false));
        self.emit(Instruction::Immediate(dst, 0));
        self.emit(Instruction::Label(exit));
        Ok(())
    }

    fn or_value(&mut self, binary: &BinaryExpr<'_>, dst: Reg) -> Result<()> {
        let n = self.next_label();
        let (on_true, exit) = (format!("OR_TRUE_{n}"), format!("OR_EXIT_{n}"));

        self.rvalue(binary.left)?;
        self.emit(Instruction::JumpIfNotZero(reg(binary.left)?, on_true.clone()));
        self.rvalue(binary.right)?;
        self.emit(Instruction::JumpIfNotZero(reg(binary.right)?, on_true.clone()));
        self.emit(Instruction::Immediate(dst, 0));
        self.emit(Instruction::Jump(exit.clone()));
        self.emit(Instruction::Label(on_true));
        self.emit(Instruction::Immediate(dst, 1));
        self.emit(Instruction::Label(exit));
        Ok(())
    }
}

/// The scratch register the register pass gave `expr`.
pub(super) fn reg(expr: Expr<'_>) -> Result<Reg> {
    expr.reg()
        .map(Reg::Scratch)
        .ok_or_else(|| missing(expr.span(), "register"))
}

fn symbol<'ast>(ident: &Ident<'ast>) -> Result<&'ast Symbol<'ast>> {
    ident.symbol().ok_or_else(|| missing(ident.span, "symbol"))
}

fn offset(symbol: &Symbol<'_>, ident: &Ident<'_>) -> Result<i64> {
    symbol.offset().ok_or_else(|| missing(ident.span, "offset"))
}

fn is_local_array(symbol: &Symbol<'_>) -> bool {
    symbol.kind() == SymbolKind::Var && symbol.ty().is_some_and(|ty| ty.is_array())
}

/// The instruction for a strict binary operator. `and`/`or` have none.
fn operator(op: BinaryOp, dst: Reg, lhs: Reg, rhs: Reg) -> Option<Instruction> {
    Some(match op {
        BinaryOp::Add => Instruction::Add(dst, lhs, rhs),
        BinaryOp::Sub => Instruction::Sub(dst, lhs, rhs),
        BinaryOp::Mul => Instruction::Mul(dst, lhs, rhs),
        BinaryOp::Div => Instruction::Div(dst, lhs, rhs),
        BinaryOp::Equal => Instruction::Equal(dst, lhs, rhs),
        BinaryOp::NotEqual => Instruction::NotEqual(dst, lhs, rhs),
        BinaryOp::Less => Instruction::LessThan(dst, lhs, rhs),
        BinaryOp::LessEqual => Instruction::LessThanEqual(dst, lhs, rhs),
        BinaryOp::Greater => Instruction::GreaterThan(dst, lhs, rhs),
        BinaryOp::GreaterEqual => Instruction::GreaterThanEqual(dst, lhs, rhs),
        BinaryOp::And | BinaryOp::Or => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::codegen::tests::{between, listing};

    #[test]
    fn print_of_nested_arithmetic() {
        let lines = listing("func main(): void { print 1 + 2 * 3 }");
        let body = between(&lines, "AddImmediate SP, SP, 3", "EPILOGUE_main:");
        assert_eq!(
            body,
            [
                "Immediate r1, 1",
                "Immediate r2, 2",
                "Immediate r3, 3",
                "Mul r2, r2, r3",
                "Add r1, r1, r2",
                "Print r1",
            ]
        );
    }

    #[test]
    fn assignment_stores_value_through_target_address() {
        let lines = listing("func main(): void { var x: int x = 5 print x }");
        let body = between(&lines, "AddImmediate SP, SP, 2", "EPILOGUE_main:");
        assert_eq!(
            body,
            [
                "Immediate r1, 5",
                "AddImmediate r2, FP, 3",
                "Store r2, r1",
                "AddImmediate r1, FP, 3",
                "Load r1, r1",
                "Print r1",
            ]
        );
    }

    #[test]
    fn call_sequence_balances_the_stack() {
        let lines = listing(
            "func f(a: int, b: int): int { return a - b }
             func main(): void { print f(4, 1) }",
        );
        let body = between(&lines, "main:", "EPILOGUE_main:");
        let body = &body[body.iter().position(|l| l == "AddImmediate SP, SP, 3").unwrap()..];
        assert_eq!(
            body,
            [
                "AddImmediate SP, SP, 3",
                "Immediate r1, 4",
                "AddImmediate curr, SP, -2",
                "Store curr, r1",
                "Immediate r1, 1",
                "AddImmediate curr, SP, -3",
                "Store curr, r1",
                "Call f",
                "AddImmediate SP2, SP, -1",
                "Load r1, SP2",
                "AddImmediate SP, SP, -3",
                "Print r1",
            ]
        );
    }

    #[test]
    fn negation_subtracts_from_zero() {
        let lines = listing("func main(): void { print -(7) }");
        assert!(lines.contains(&"Sub r1, zero, r1".to_string()));
        let lines = listing("func main(): void { print not true }");
        assert!(lines.contains(&"Not r1, r1".to_string()));
    }

    #[test]
    fn and_value_materialises_zero_or_one() {
        let lines = listing("func main(): void { var b: bool b = true and false }");
        let body = between(&lines, "AddImmediate SP, SP, 2", "EPILOGUE_main:");
        assert_eq!(
            &body[..9],
            [
                "Immediate r1, 1",
                "JumpIfZero r1, AND_FALSE_0",
                "Immediate r2, 0",
                "JumpIfZero r2, AND_FALSE_0",
                "Immediate r1, 1",
                "Jump AND_EXIT_0",
                "AND_FALSE_0:",
                "Immediate r1, 0",
                "AND_EXIT_0:",
            ]
        );
    }

    #[test]
    fn local_array_cells_and_addresses() {
        let lines = listing(
            "func sum(a: []int): int { return a[1] }
             func main(): void { var v: [2]int v[1] = 9 print sum(v) }",
        );
        let sum = between(&lines, "sum:", "EPILOGUE_sum:");
        let param_cell = [
            "AddImmediate r1, FP, -2",
            "Load r1, r1",
            "Immediate r2, 1",
            "Add r1, r1, r2",
            "Load r1, r1",
        ];
        assert!(sum.windows(5).any(|w| w == param_cell));

        let main = between(&lines, "main:", "EPILOGUE_main:");
        let store = [
            "Immediate r1, 9",
            "AddImmediate r2, FP, 3",
            "Immediate r3, 1",
            "Add r2, r2, r3",
            "Store r2, r1",
        ];
        assert!(main.windows(5).any(|w| w == store));
        // The array argument is passed by address.
        let arg = ["AddImmediate r1, FP, 3", "AddImmediate curr, SP, -2"];
        assert!(main.windows(2).any(|w| w == arg));
    }
}
