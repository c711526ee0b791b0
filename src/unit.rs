//! Compilation unit API.
//!
//! A [`Unit`] collects named source files, compiles them as one program and
//! runs the result on the reference [`Vm`].
//!
//! # Example
//!
//! ```
//! use tau::Unit;
//!
//! let mut unit = Unit::new();
//! unit.add_source("math.tau", "func square(n: int): int { return n * n }");
//! unit.add_source("main.tau", "func main(): void { print square(7) }");
//!
//! let execution = unit.run().unwrap();
//! assert_eq!(execution.output, [49]);
//! ```

use std::ops::Range;

use bumpalo::Bump;
use bumpalo::collections::Vec as BVec;
use indexmap::IndexMap;
use log::debug;
use tau_compiler::{CompiledProgram, Compiler};
use tau_core::{CompilationError, Span, TauError};
use tau_parser::Parser;
use tau_parser::ast::Program;

use crate::vm::{Execution, Vm, VmConfig};

/// A set of source files compiled together.
///
/// Sources are concatenated in the order they were first added, so a
/// function can call functions from any earlier source. Every build parses
/// from scratch into a fresh arena.
#[derive(Debug, Default, Clone)]
pub struct Unit {
    /// Source files to compile (filename → source code).
    sources: IndexMap<String, String>,
}

impl Unit {
    /// Create an empty compilation unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source file. A file with the same name is replaced in place,
    /// keeping its position.
    pub fn add_source(&mut self, filename: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(filename.into(), source.into());
    }

    /// Remove every source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Get the number of source files in the unit.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Parse every source and run all compiler passes over the result.
    ///
    /// # Errors
    ///
    /// The first parse or compilation error. An empty unit has no `main` and
    /// fails with a missing entry point.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&self) -> Result<CompiledProgram, TauError> {
        let arena = Bump::new();
        let (program, origins) = self.parse_all(&arena)?;
        let compiled = Compiler::compile(program, &arena).inspect_err(|err| {
            if log::log_enabled!(log::Level::Debug) {
                let files = origins.files_containing(program, err);
                if files.is_empty() {
                    debug!("{}: {err}", self.filenames().join(", "));
                } else {
                    debug!("{}: {err}", files.join(" or "));
                }
            }
        })?;
        debug!(
            "built {} source(s): {} instruction(s)",
            self.sources.len(),
            compiled.instructions.len()
        );
        Ok(compiled)
    }

    /// Build and run with the default machine configuration.
    pub fn run(&self) -> Result<Execution, TauError> {
        self.run_with(VmConfig::default())
    }

    /// Build and run with `config`.
    pub fn run_with(&self, config: VmConfig) -> Result<Execution, TauError> {
        let compiled = self.build()?;
        let mut vm = Vm::new(&compiled.instructions, config)?;
        vm.run()?;
        Ok(vm.into_execution())
    }

    fn filenames(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Parse each source into `arena` and join their functions into one
    /// program, remembering which file each function came from.
    fn parse_all<'ast>(
        &'ast self,
        arena: &'ast Bump,
    ) -> Result<(&'ast Program<'ast>, Origins<'ast>), TauError> {
        let mut functions = BVec::new_in(arena);
        let mut origins = Origins::default();
        let mut span: Option<Span> = None;

        for (filename, source) in &self.sources {
            let program = Parser::parse(source, arena).inspect_err(|err| {
                debug!("{filename}: {}", err.display_with_source(source));
            })?;
            debug!("{filename}: {} function(s)", program.functions.len());
            let start = functions.len();
            functions.extend(program.functions.iter().copied());
            origins.push(filename, start..functions.len());
            span = Some(span.map_or(program.span, |s| s.merge(program.span)));
        }

        let program = arena.alloc(Program::new(
            functions.into_bump_slice(),
            span.unwrap_or_default(),
        ));
        Ok((program, origins))
    }
}

/// The file each run of functions in a joined program was parsed from.
///
/// Every file numbers its lines from 1, so a span alone cannot name its
/// file; only the functions enclosing it can.
#[derive(Debug, Default)]
struct Origins<'a> {
    files: Vec<(&'a str, Range<usize>)>,
}

impl<'a> Origins<'a> {
    fn push(&mut self, filename: &'a str, functions: Range<usize>) {
        self.files.push((filename, functions));
    }

    /// Files with a function enclosing the span of `err`, in source order.
    /// Empty when no function does, as for a missing entry point.
    fn files_containing(&self, program: &Program<'_>, err: &CompilationError) -> Vec<&'a str> {
        let span = err.span();
        self.files
            .iter()
            .filter(|(_, functions)| {
                program.functions[functions.clone()]
                    .iter()
                    .any(|func| func.span.contains(span))
            })
            .map(|&(filename, _)| filename)
            .collect()
    }
}
