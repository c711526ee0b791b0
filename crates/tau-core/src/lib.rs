//! Core types shared by the Tau parser, compiler and interpreter.
//!
//! - [`span`]: source locations carried by every AST node
//! - [`error`]: the error hierarchy for every phase
//! - [`semantic_type`]: types assigned by the type checker
//! - [`symbol`]: scopes and declared symbols built by the binder

pub mod error;
pub mod semantic_type;
pub mod span;
pub mod symbol;

pub use error::{
    CompilationError, LexError, ParseError, ParseErrorKind, RuntimeError, TauError,
};
pub use semantic_type::SemanticType;
pub use span::Span;
pub use symbol::{Scope, ScopeKind, Symbol, SymbolKind};
