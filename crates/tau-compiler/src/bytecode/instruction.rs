//! The target machine's instruction set.
//!
//! Operands are written destination first, matching the listing format:
//! `AddImmediate SP1, FP1, 4` sets `SP1 = FP1 + 4`.

use std::fmt;

use super::Reg;

/// One machine instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    // =========================================================================
    // Control flow
    // =========================================================================
    /// Marks a jump target. Executes as a no-op.
    Label(String),
    /// Unconditional jump to a label.
    Jump(String),
    /// Jump to the instruction index held in a register.
    JumpIndirect(Reg),
    /// Jump to the label when the register is zero.
    JumpIfZero(Reg, String),
    /// Jump to the label when the register is non-zero.
    JumpIfNotZero(Reg, String),
    /// Set `RA` to the next instruction and jump to the label.
    Call(String),
    /// Stop the machine.
    Halt,

    // =========================================================================
    // Data movement
    // =========================================================================
    /// `dst = src`
    Move(Reg, Reg),
    /// `dst = value`
    Immediate(Reg, i64),
    /// `dst = src + value`
    AddImmediate(Reg, Reg, i64),
    /// `dst = memory[addr]`
    Load(Reg, Reg),
    /// `memory[addr] = src`, written `Store addr, src`.
    Store(Reg, Reg),

    // =========================================================================
    // Arithmetic and comparison: `dst = lhs op rhs`
    // =========================================================================
    Add(Reg, Reg, Reg),
    Sub(Reg, Reg, Reg),
    Mul(Reg, Reg, Reg),
    Div(Reg, Reg, Reg),
    Equal(Reg, Reg, Reg),
    NotEqual(Reg, Reg, Reg),
    LessThan(Reg, Reg, Reg),
    LessThanEqual(Reg, Reg, Reg),
    GreaterThan(Reg, Reg, Reg),
    GreaterThanEqual(Reg, Reg, Reg),
    /// `dst = (src == 0) as int`
    Not(Reg, Reg),

    // =========================================================================
    // Output
    // =========================================================================
    /// Append the register's value to the program output.
    Print(Reg),
}

impl Instruction {
    /// The mnemonic used in listings.
    pub fn name(&self) -> &'static str {
        use Instruction::*;
        match self {
            Label(_) => "Label",
            Jump(_) => "Jump",
            JumpIndirect(_) => "JumpIndirect",
            JumpIfZero(..) => "JumpIfZero",
            JumpIfNotZero(..) => "JumpIfNotZero",
            Call(_) => "Call",
            Halt => "Halt",
            Move(..) => "Move",
            Immediate(..) => "Immediate",
            AddImmediate(..) => "AddImmediate",
            Load(..) => "Load",
            Store(..) => "Store",
            Add(..) => "Add",
            Sub(..) => "Sub",
            Mul(..) => "Mul",
            Div(..) => "Div",
            Equal(..) => "Equal",
            NotEqual(..) => "NotEqual",
            LessThan(..) => "LessThan",
            LessThanEqual(..) => "LessThanEqual",
            GreaterThan(..) => "GreaterThan",
            GreaterThanEqual(..) => "GreaterThanEqual",
            Not(..) => "Not",
            Print(_) => "Print",
        }
    }

    /// The label this instruction may transfer control to, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Instruction::Jump(label)
            | Instruction::JumpIfZero(_, label)
            | Instruction::JumpIfNotZero(_, label)
            | Instruction::Call(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match self {
            Label(label) => write!(f, "{label}:"),
            Halt => write!(f, "    {}", self.name()),
            Jump(label) | Call(label) => write!(f, "    {} {label}", self.name()),
            JumpIndirect(reg) | Print(reg) => write!(f, "    {} {reg}", self.name()),
            JumpIfZero(reg, label) | JumpIfNotZero(reg, label) => {
                write!(f, "    {} {reg}, {label}", self.name())
            }
            Move(a, b) | Load(a, b) | Store(a, b) | Not(a, b) => {
                write!(f, "    {} {a}, {b}", self.name())
            }
            Immediate(dst, value) => write!(f, "    {} {dst}, {value}", self.name()),
            AddImmediate(dst, src, value) => {
                write!(f, "    {} {dst}, {src}, {value}", self.name())
            }
            Add(d, l, r)
            | Sub(d, l, r)
            | Mul(d, l, r)
            | Div(d, l, r)
            | Equal(d, l, r)
            | NotEqual(d, l, r)
            | LessThan(d, l, r)
            | LessThanEqual(d, l, r)
            | GreaterThan(d, l, r)
            | GreaterThanEqual(d, l, r) => write!(f, "    {} {d}, {l}, {r}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_format() {
        assert_eq!(Instruction::Label("main".into()).to_string(), "main:");
        assert_eq!(
            Instruction::AddImmediate(Reg::Sp1, Reg::Fp1, 4).to_string(),
            "    AddImmediate SP1, FP1, 4"
        );
        assert_eq!(
            Instruction::Store(Reg::Temp, Reg::Fp).to_string(),
            "    Store temp, FP"
        );
        assert_eq!(
            Instruction::Sub(Reg::Scratch(1), Reg::Zero, Reg::Scratch(1)).to_string(),
            "    Sub r1, zero, r1"
        );
        assert_eq!(Instruction::Halt.to_string(), "    Halt");
    }

    #[test]
    fn jump_targets() {
        assert_eq!(Instruction::Call("f".into()).target(), Some("f"));
        assert_eq!(
            Instruction::JumpIfZero(Reg::Scratch(2), "ELSE_0".into()).target(),
            Some("ELSE_0")
        );
        assert_eq!(Instruction::JumpIndirect(Reg::Ra).target(), None);
    }
}
