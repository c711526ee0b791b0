//! Tau parser crate.
//!
//! Provides the scanner and recursive-descent parser for Tau source, and
//! the arena-allocated AST the compiler passes annotate.
//!
//! ```
//! use tau_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     func fact(n: int): int {
//!         if n < 2 { return 1 }
//!         return n * fact(n - 1)
//!     }
//!     func main(): void { print fact(5) }
//! "#;
//!
//! match Parser::parse(source, &arena) {
//!     Ok(program) => println!("parsed {} functions", program.functions.len()),
//!     Err(error) => eprintln!("{}", error.display_with_source(source)),
//! }
//! ```

pub mod ast;
pub mod lexer;

pub use ast::Parser;
pub use lexer::{Lexer, Token, TokenKind};
