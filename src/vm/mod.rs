//! Reference interpreter for compiled Tau programs.
//!
//! The machine has a flat word memory, the named registers of
//! [`Reg`](tau_compiler::Reg) plus
//! any number of scratch registers, and an instruction pointer indexing into
//! the instruction slice. Labels are resolved once, before execution.
//!
//! # Example
//!
//! ```
//! use tau::vm::{Vm, VmConfig};
//! use tau::{Instruction, Reg};
//!
//! let code = vec![
//!     Instruction::Immediate(Reg::Scratch(1), 7),
//!     Instruction::Print(Reg::Scratch(1)),
//!     Instruction::Halt,
//! ];
//! let mut vm = Vm::new(&code, VmConfig::default()).unwrap();
//! vm.run().unwrap();
//! assert_eq!(vm.output(), &[7]);
//! ```

mod memory;
#[allow(clippy::module_inception)]
mod vm;

pub use memory::Memory;
pub use vm::Vm;

/// Interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Memory size in words.
    pub memory_size: usize,
    /// Initial value of both `FP` and `SP`.
    pub stack_base: i64,
    /// Maximum instructions to execute, `None` for no limit.
    pub step_limit: Option<u64>,
}

impl VmConfig {
    pub const DEFAULT_MEMORY_SIZE: usize = 1 << 16;
    pub const DEFAULT_STACK_BASE: i64 = 16;
    pub const DEFAULT_STEP_LIMIT: u64 = 10_000_000;

    pub fn new() -> Self {
        Self {
            memory_size: Self::DEFAULT_MEMORY_SIZE,
            stack_base: Self::DEFAULT_STACK_BASE,
            step_limit: Some(Self::DEFAULT_STEP_LIMIT),
        }
    }

    pub fn with_memory_size(mut self, words: usize) -> Self {
        self.memory_size = words;
        self
    }

    pub fn with_stack_base(mut self, base: i64) -> Self {
        self.stack_base = base;
        self
    }

    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What a finished run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Values printed, in order.
    pub output: Vec<i64>,
    /// Instructions executed, `Halt` included.
    pub steps: u64,
    /// `SP` when the machine halted.
    pub final_sp: i64,
    /// `FP` when the machine halted.
    pub final_fp: i64,
}
