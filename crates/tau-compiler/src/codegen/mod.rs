//! Code generation: lowers an annotated program to [`Instruction`]s.
//!
//! The [`CodeGenerator`] walks one function at a time and appends to a single
//! instruction vector. Lowering is split across:
//!
//! - `frame`: prologue, epilogue and the register spill around a body
//! - `expr`: rvalue, lvalue and call sequences
//! - `flow`: jumping code for conditions
//! - `stmt`: statements
//!
//! The program starts with `Call main; Halt`, followed by each function in
//! declaration order.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use tau_compiler::{codegen::generate, passes};
//! use tau_parser::Parser;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("func main(): void { print 7 }", &arena).unwrap();
//! passes::bind(program, &arena).unwrap();
//! passes::typecheck(program, &arena).unwrap();
//! passes::layout(program).unwrap();
//! passes::assign_registers(program).unwrap();
//!
//! let code = generate(program).unwrap();
//! assert_eq!(code[0].to_string(), "    Call main");
//! ```

mod expr;
mod flow;
mod frame;
mod stmt;

use log::debug;
use tau_core::CompilationError;
use tau_parser::ast::{FuncDecl, Program};

use crate::bytecode::{Instruction, Reg};
use crate::passes::missing;

type Result<T> = std::result::Result<T, CompilationError>;

/// Name of the function execution starts in.
pub const ENTRY_POINT: &str = "main";

/// Generate the instruction sequence for a fully annotated program.
///
/// Fails with [`CompilationError::MissingEntryPoint`] when there is no
/// `main`, before emitting anything.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate(program: &Program<'_>) -> Result<Vec<Instruction>> {
    let mut generator = CodeGenerator::new();
    generator.program(program)?;
    Ok(generator.finish())
}

/// Instruction buffer plus the per-program label counter.
pub struct CodeGenerator {
    code: Vec<Instruction>,
    /// Next synthetic label number.
    labels: u32,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            labels: 0,
        }
    }

    /// Lower the whole program.
    pub fn program(&mut self, program: &Program<'_>) -> Result<()> {
        if program.function(ENTRY_POINT).is_none() {
            return Err(CompilationError::MissingEntryPoint { span: program.span });
        }
        debug!("generating code for {} function(s)", program.functions.len());

        self.emit(Instruction::Call(ENTRY_POINT.to_string()));
        self.emit(Instruction::Halt);
        for &func in program.functions {
            let start = self.code.len();
            self.function(func)?;
            debug!(
                "'{}': {} instruction(s)",
                func.name.name,
                self.code.len() - start
            );
        }
        Ok(())
    }

    /// Take the generated instructions.
    pub fn finish(self) -> Vec<Instruction> {
        self.code
    }

    fn function(&mut self, func: &FuncDecl<'_>) -> Result<()> {
        let size = func
            .frame_size()
            .ok_or_else(|| missing(func.span, "frame size"))?;
        let pool = func
            .register_pool()
            .ok_or_else(|| missing(func.span, "register pool"))?;

        self.emit(Instruction::Label(func.name.name.to_string()));
        self.prologue(size);
        self.spill(size, pool);
        self.compound(func.body)?;
        self.emit(Instruction::Label(epilogue_label(func.name.name)));
        self.reload(size, pool);
        self.epilogue();
        Ok(())
    }

    // =========================================================================
    // Emission helpers
    // =========================================================================

    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Take the next label number. Each `if`, `while`, `and` and `or` node
    /// takes exactly one.
    fn next_label(&mut self) -> u32 {
        let n = self.labels;
        self.labels += 1;
        n
    }

    /// `dst = FP + offset`
    fn frame_address(&mut self, dst: Reg, offset: i64) {
        self.emit(Instruction::AddImmediate(dst, Reg::Fp, offset));
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Label of the shared exit sequence of `name`.
pub fn epilogue_label(name: &str) -> String {
    format!("EPILOGUE_{name}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::passes;
    use crate::test_support::{init_logging, parse};
    use bumpalo::Bump;

    /// Compile `src` and render the listing, one instruction per line.
    pub(crate) fn listing(src: &str) -> Vec<String> {
        init_logging();
        let arena = Bump::new();
        let program = parse(&arena, src);
        passes::bind(program, &arena).unwrap();
        passes::typecheck(program, &arena).unwrap();
        passes::layout(program).unwrap();
        passes::assign_registers(program).unwrap();
        generate(program)
            .unwrap()
            .iter()
            .map(|i| i.to_string().trim().to_string())
            .collect()
    }

    /// The lines between `start` (exclusive) and the first `end` after it.
    pub(crate) fn between<'a>(lines: &'a [String], start: &str, end: &str) -> &'a [String] {
        let from = lines.iter().position(|l| l == start).unwrap() + 1;
        let len = lines[from..].iter().position(|l| l == end).unwrap();
        &lines[from..from + len]
    }

    #[test]
    fn missing_main_emits_nothing() {
        let arena = Bump::new();
        let program = parse(&arena, "func f(): void { }");
        passes::bind(program, &arena).unwrap();
        passes::typecheck(program, &arena).unwrap();
        passes::layout(program).unwrap();
        passes::assign_registers(program).unwrap();
        assert!(matches!(
            generate(program),
            Err(CompilationError::MissingEntryPoint { .. })
        ));
    }

    #[test]
    fn unannotated_program_is_internal_error() {
        let arena = Bump::new();
        let program = parse(&arena, "func main(): void { }");
        assert!(matches!(
            generate(program),
            Err(CompilationError::Internal { .. })
        ));
    }

    #[test]
    fn program_shape() {
        let lines = listing("func helper(): void { } func main(): void { call helper() }");
        assert_eq!(lines[0], "Call main");
        assert_eq!(lines[1], "Halt");
        assert_eq!(lines[2], "helper:");
        assert!(lines.contains(&"EPILOGUE_helper:".to_string()));
        assert!(lines.contains(&"main:".to_string()));
        assert_eq!(lines.last().unwrap(), "JumpIndirect RA");
    }

    #[test]
    fn labels_are_unique_across_functions() {
        let lines = listing(
            "func f(): void { if true { } }
             func main(): void { if true { } while false { } }",
        );
        let labels: Vec<_> = lines.iter().filter(|l| l.ends_with(':')).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
        assert!(labels.contains(&&"ELSE_0:".to_string()));
        assert!(labels.contains(&&"ELSE_1:".to_string()));
        assert!(labels.contains(&&"EXIT_LOOP_2:".to_string()));
    }
}
