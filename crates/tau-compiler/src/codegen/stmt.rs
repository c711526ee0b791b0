//! Statement lowering.

use tau_parser::ast::*;

use super::expr::reg;
use super::{CodeGenerator, Result, epilogue_label};
use crate::bytecode::{Instruction, Reg};
use crate::passes::layout::RETURN_SLOT_OFFSET;
use crate::passes::missing;

impl CodeGenerator {
    pub(super) fn compound(&mut self, block: &CompoundStmt<'_>) -> Result<()> {
        for stmt in block.stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match *stmt {
            Stmt::Assign(assign) => {
                self.rvalue(assign.value)?;
                self.lvalue(assign.target)?;
                self.emit(Instruction::Store(reg(assign.target)?, reg(assign.value)?));
            }
            Stmt::Call(call) => self.call(call.call)?,
            Stmt::Compound(block) => self.compound(block)?,
            Stmt::If(if_stmt) => self.if_stmt(if_stmt)?,
            Stmt::Print(print) => {
                self.rvalue(print.value)?;
                self.emit(Instruction::Print(reg(print.value)?));
            }
            Stmt::Return(ret) => self.return_stmt(ret)?,
            Stmt::While(while_stmt) => self.while_stmt(while_stmt)?,
        }
        Ok(())
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt<'_>) -> Result<()> {
        let n = self.next_label();
        let (otherwise, bottom) = (format!("ELSE_{n}"), format!("BOTTOM_{n}"));

        self.flow(if_stmt.condition, &otherwise, false)?;
        self.compound(if_stmt.then_branch)?;
        self.emit(Instruction::Jump(bottom.clone()));
        self.emit(Instruction::Label(otherwise));
        if let Some(else_branch) = if_stmt.else_branch {
            self.compound(else_branch)?;
        }
        self.emit(Instruction::Label(bottom));
        Ok(())
    }

    fn while_stmt(&mut self, while_stmt: &WhileStmt<'_>) -> Result<()> {
        let n = self.next_label();
        let (top, exit) = (format!("START_LOOP_{n}"), format!("EXIT_LOOP_{n}"));

        self.emit(Instruction::Label(top.clone()));
        self.flow(while_stmt.condition, &exit, false)?;
        self.compound(while_stmt.body)?;
        self.emit(Instruction::Jump(top));
        self.emit(Instruction::Label(exit));
        Ok(())
    }

    fn return_stmt(&mut self, ret: &ReturnStmt<'_>) -> Result<()> {
        let func = ret
            .func()
            .ok_or_else(|| missing(ret.span, "enclosing function"))?;
        if let Some(value) = ret.value {
            self.rvalue(value)?;
            self.frame_address(Reg::Fp1, RETURN_SLOT_OFFSET);
            self.emit(Instruction::Store(Reg::Fp1, reg(value)?));
        }
        self.emit(Instruction::Jump(epilogue_label(func.name.name)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::tests::{between, listing};

    #[test]
    fn if_else_shape() {
        let lines = listing("func main(): void { if 1 < 2 { print 1 } else { print 2 } }");
        let from = lines.iter().position(|l| l == "LessThan r1, r1, r2").unwrap();
        assert_eq!(
            &lines[from..from + 9],
            [
                "LessThan r1, r1, r2",
                "JumpIfZero r1, ELSE_0",
                "Immediate r1, 1",
                "Print r1",
                "Jump BOTTOM_0",
                "ELSE_0:",
                "Immediate r1, 2",
                "Print r1",
                "BOTTOM_0:",
            ]
        );
    }

    #[test]
    fn return_value_goes_below_the_frame() {
        let lines = listing("func f(): int { return 42 } func main(): void { print f() }");
        let body = between(&lines, "Store temp, r1", "EPILOGUE_f:");
        assert_eq!(
            body,
            [
                "AddImmediate SP, SP, 1",
                "Immediate r1, 42",
                "AddImmediate FP1, FP, -1",
                "Store FP1, r1",
                "Jump EPILOGUE_f",
            ]
        );
    }

    #[test]
    fn bare_return_jumps_to_epilogue() {
        let lines = listing("func main(): void { return }");
        let body = between(&lines, "AddImmediate SP, SP, 1", "EPILOGUE_main:");
        assert_eq!(body, ["Jump EPILOGUE_main"]);
    }
}
