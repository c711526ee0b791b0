//! Jumping code for conditions.
//!
//! `flow(e, label, desired)` falls through unless `e` evaluates to
//! `desired`, in which case it jumps to `label`. `and`/`or` short-circuit
//! without ever materialising their own value.

use tau_parser::ast::*;

use super::expr::reg;
use super::{CodeGenerator, Result};
use crate::bytecode::Instruction;

impl CodeGenerator {
    pub(super) fn flow(&mut self, expr: Expr<'_>, label: &str, desired: bool) -> Result<()> {
        match expr {
            Expr::BoolLiteral(lit) => {
                if lit.value == desired {
                    self.emit(Instruction::Jump(label.to_string()));
                }
                Ok(())
            }
            Expr::Unary(unary) if unary.op == UnaryOp::Not => {
                self.flow(unary.operand, label, !desired)
            }
            Expr::Binary(binary) if binary.op == BinaryOp::And => {
                if desired {
                    let skip = format!("AND_LAB_{}", self.next_label());
                    self.flow(binary.left, &skip, false)?;
                    self.flow(binary.right, label, true)?;
                    self.emit(Instruction::Label(skip));
                } else {
                    self.next_label();
                    self.flow(binary.left, label, false)?;
                    self.flow(binary.right, label, false)?;
                }
                Ok(())
            }
            Expr::Binary(binary) if binary.op == BinaryOp::Or => {
                if desired {
                    self.next_label();
                    self.flow(binary.left, label, true)?;
                    self.flow(binary.right, label, true)?;
                } else {
                    let skip = format!("OR_LAB_{}", self.next_label());
                    self.flow(binary.left, &skip, true)?;
                    self.flow(binary.right, label, false)?;
                    self.emit(Instruction::Label(skip));
                }
                Ok(())
            }
            _ => {
                self.rvalue(expr)?;
                let value = reg(expr)?;
                self.emit(if desired {
                    Instruction::JumpIfNotZero(value, label.to_string())
                } else {
                    Instruction::JumpIfZero(value, label.to_string())
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::tests::{between, listing};

    fn condition(src_cond: &str) -> Vec<String> {
        let lines = listing(&format!(
            "func main(): void {{ var a: bool var b: bool if {src_cond} {{ print 1 }} }}"
        ));
        let from = lines.iter().position(|l| l == "AddImmediate SP, SP, 1").unwrap();
        let spill_end = lines[from + 1..]
            .iter()
            .position(|l| l.starts_with("AddImmediate SP, SP,"))
            .map(|i| from + 2 + i)
            .unwrap_or(from + 1);
        let end = lines.iter().position(|l| l == "Immediate r1, 1").unwrap();
        lines[spill_end..end].to_vec()
    }

    #[test]
    fn literal_conditions() {
        assert_eq!(condition("true"), Vec::<String>::new());
        assert_eq!(condition("false"), ["Jump ELSE_0"]);
        assert_eq!(condition("not true"), ["Jump ELSE_0"]);
    }

    #[test]
    fn and_falls_through_only_when_both_hold() {
        assert_eq!(
            condition("a and b"),
            [
                "AddImmediate r1, FP, 3",
                "Load r1, r1",
                "JumpIfZero r1, ELSE_0",
                "AddImmediate r2, FP, 4",
                "Load r2, r2",
                "JumpIfZero r2, ELSE_0",
            ]
        );
    }

    #[test]
    fn or_skips_the_right_operand_when_left_holds() {
        assert_eq!(
            condition("a or b"),
            [
                "AddImmediate r1, FP, 3",
                "Load r1, r1",
                "JumpIfNotZero r1, OR_LAB_1",
                "AddImmediate r2, FP, 4",
                "Load r2, r2",
                "JumpIfZero r2, ELSE_0",
                "OR_LAB_1:",
            ]
        );
    }

    #[test]
    fn negated_and_jumps_when_either_fails() {
        // not (a and b) is false exactly when both hold.
        assert_eq!(
            condition("not (a and b)"),
            [
                "AddImmediate r1, FP, 3",
                "Load r1, r1",
                "JumpIfZero r1, AND_LAB_1",
                "AddImmediate r2, FP, 4",
                "Load r2, r2",
                "JumpIfNotZero r2, ELSE_0",
                "AND_LAB_1:",
            ]
        );
    }

    #[test]
    fn while_loop_shape() {
        let lines = listing("func main(): void { while true { print 1 } }");
        let body = between(&lines, "START_LOOP_0:", "EXIT_LOOP_0:");
        assert_eq!(body, ["Immediate r1, 1", "Print r1", "Jump START_LOOP_0"]);
    }
}
