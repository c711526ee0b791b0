//! Instruction vocabulary of the target machine.
//!
//! - [`Instruction`] - One machine instruction, with a listing `Display`
//! - [`Reg`] - Register operands

mod instruction;
mod register;

pub use instruction::Instruction;
pub use register::Reg;
