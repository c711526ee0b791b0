//! Tau: a small imperative language compiled to a register machine.
//!
//! This crate ties the workspace together:
//!
//! - [`Unit`]: add sources, build them into a [`CompiledProgram`], run it
//! - [`vm`]: the reference interpreter for the generated instructions
//!
//! The parser, compiler passes and shared types live in `tau-parser`,
//! `tau-compiler` and `tau-core` and are re-exported here.
//!
//! # Example
//!
//! ```
//! use tau::Unit;
//!
//! let mut unit = Unit::new();
//! unit.add_source(
//!     "fact.tau",
//!     "func fact(n: int): int {
//!          if n <= 1 { return 1 } else { return n * fact(n - 1) }
//!      }
//!      func main(): void { print fact(5) }",
//! );
//! assert_eq!(unit.run().unwrap().output, [120]);
//! ```

pub mod unit;
pub mod vm;

pub use unit::Unit;
pub use vm::{Execution, Vm, VmConfig};

pub use tau_compiler::{CompiledFunction, CompiledProgram, Compiler, Instruction, Reg};
pub use tau_core::{
    CompilationError, LexError, ParseError, ParseErrorKind, RuntimeError, SemanticType, Span,
    TauError,
};
pub use tau_parser::Parser;

/// Everything needed to build and run programs.
pub mod prelude {
    pub use crate::unit::Unit;
    pub use crate::vm::{Execution, VmConfig};
    pub use tau_core::TauError;
}
