//! Tau Compiler
//!
//! Lowers a parsed Tau program to instructions for a small register machine.
//!
//! ## Architecture
//!
//! Five passes run in order over one arena-allocated AST, each filling
//! write-once annotation slots the next one reads:
//!
//! 1. **Binding**: scopes, symbols, name resolution
//! 2. **Type checking**: semantic types for every declaration and expression
//! 3. **Frame layout**: stack offsets and frame sizes
//! 4. **Register assignment**: scratch registers and per-function pools
//! 5. **Code generation**: instructions with jumping code for conditions
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction and register vocabulary
//! - [`passes`]: Binding, type checking, layout and register assignment
//! - [`codegen`]: Instruction generation
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use tau_compiler::Compiler;
//! use tau_parser::Parser;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("func main(): void { print 1 + 2 * 3 }", &arena).unwrap();
//! let compiled = Compiler::compile(program, &arena).unwrap();
//!
//! assert_eq!(compiled.function("main").unwrap().register_pool, 3);
//! ```

pub mod bytecode;
pub mod codegen;
pub mod passes;

use std::fmt;

use bumpalo::Bump;
use log::debug;
use tau_parser::ast::Program;

pub use bytecode::{Instruction, Reg};
pub use codegen::{CodeGenerator, generate};

// Re-export CompilationError from core for convenience
pub use tau_core::CompilationError;

/// A compiled program: the instruction sequence and what was decided about
/// each function along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledProgram {
    /// Instructions, starting with `Call main; Halt`.
    pub instructions: Vec<Instruction>,
    /// One entry per function, in declaration order.
    pub functions: Vec<CompiledFunction>,
}

impl CompiledProgram {
    /// Look up a function summary by name.
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Per-function results of layout and register assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    /// Function name, also its entry label.
    pub name: String,
    /// Frame size in words, header included.
    pub frame_size: i64,
    /// Number of scratch registers the function saves and restores.
    pub register_pool: u32,
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// The main compiler entry point.
pub struct Compiler;

impl Compiler {
    /// Run all five passes over `program`.
    ///
    /// `arena` must be the arena the program was parsed into; scopes and
    /// symbols are allocated next to the nodes that refer to them. The first
    /// error stops compilation.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(
        program: &Program<'ast>,
        arena: &'ast Bump,
    ) -> Result<CompiledProgram, CompilationError> {
        passes::bind(program, arena)?;
        passes::typecheck(program, arena)?;
        passes::layout(program)?;
        passes::assign_registers(program)?;
        let instructions = generate(program)?;

        let functions = program
            .functions
            .iter()
            .map(|func| -> Result<CompiledFunction, CompilationError> {
                Ok(CompiledFunction {
                    name: func.name.name.to_string(),
                    frame_size: func
                        .frame_size()
                        .ok_or_else(|| passes::missing(func.span, "frame size"))?,
                    register_pool: func
                        .register_pool()
                        .ok_or_else(|| passes::missing(func.span, "register pool"))?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "compiled {} function(s) into {} instruction(s)",
            functions.len(),
            instructions.len()
        );
        Ok(CompiledProgram {
            instructions,
            functions,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use bumpalo::Bump;
    use tau_parser::{Parser, ast::Program};

    pub(crate) fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    pub(crate) fn parse<'a>(arena: &'a Bump, src: &str) -> &'a Program<'a> {
        match Parser::parse(src, arena) {
            Ok(program) => program,
            Err(err) => panic!("parse failed: {}", err.display_with_source(src)),
        }
    }
}
