//! Abstract Syntax Tree (AST) for Tau.
//!
//! Every node is allocated in a `bumpalo` arena and lives as long as it.
//! The tree structure is fixed once parsed; the compiler passes only fill
//! the write-once annotation slots that nodes carry (resolved symbols,
//! semantic types, scratch registers, frame sizes).
//!
//! # Example
//!
//! ```
//! use tau_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("func main(): void { print 1 + 2 * 3 }", &arena).unwrap();
//! assert_eq!(program.functions.len(), 1);
//! ```

pub mod node;
pub mod ops;

mod parser;
pub mod types;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub mod decl;
mod decl_parser;

pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;
pub use types::*;
