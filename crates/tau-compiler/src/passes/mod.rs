//! Semantic passes, run in this order over one shared AST:
//!
//! - [`binding`]: build scopes, declare symbols and resolve every name
//! - [`typecheck`]: assign semantic types and enforce the type rules
//! - [`layout`]: give variables and parameters frame offsets, size frames
//! - [`registers`]: give every expression a scratch register
//!
//! Each pass only fills annotation slots the previous passes left empty.
//! Finding a slot already filled, or one an earlier pass should have filled
//! still empty, is a broken pipeline and reported as
//! [`CompilationError::Internal`].

pub mod binding;
pub mod layout;
pub mod registers;
pub mod typecheck;

pub use binding::bind;
pub use layout::layout;
pub use registers::assign_registers;
pub use typecheck::typecheck;

use tau_core::{CompilationError, Span};

pub(crate) type Result<T> = std::result::Result<T, CompilationError>;

/// An annotation was written twice.
pub(crate) fn already_set(span: Span, what: &str) -> CompilationError {
    CompilationError::internal(span, format!("{what} assigned twice"))
}

/// An annotation an earlier pass should have written is missing.
pub(crate) fn missing(span: Span, what: &str) -> CompilationError {
    CompilationError::internal(span, format!("{what} missing; earlier pass did not run"))
}
