//! Error types for every phase of the Tau toolchain.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TauError (top-level wrapper)
//! ├── ParseError        - Scanner and parser errors (with ParseErrorKind)
//! │   └── LexError      - Tokenization errors, folded into ParseError
//! ├── CompilationError  - Binding, type checking and code generation errors
//! └── RuntimeError      - Errors raised by the reference interpreter
//! ```
//!
//! Compilation is fail-fast: each pass returns the first error it finds and
//! the pipeline stops there. No error is ever aggregated across a tree walk.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during tokenization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// An integer literal that does not fit in a machine word.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Kinds of syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The scanner rejected the input.
    InvalidToken,
    /// A particular token was required here.
    ExpectedToken,
    /// The source ended early.
    UnexpectedEof,
    /// No expression could start here.
    ExpectedExpression,
    /// No type could start here.
    ExpectedType,
    /// No statement could start here.
    ExpectedStatement,
    /// A name was required here.
    ExpectedIdentifier,
    /// A function declaration was expected at top level.
    ExpectedDeclaration,
}

impl ParseErrorKind {
    /// Short description used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::InvalidToken => "invalid token",
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedStatement => "expected statement",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The first syntax error in a source, with its location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub span: Span,
    /// Expected and found, in words.
    pub message: String,
}

impl ParseError {
    /// Build an error of `kind` at `span`.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// `expected X, found Y`.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// The source ended while `expected` was still needed.
    pub fn unexpected_eof(span: Span, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            format!("expected {expected}, found end of file"),
        )
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("error at {}: {}\n", self.span, self.kind);
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth(self.span.line.saturating_sub(1) as usize) {
            let indent = " ".repeat(self.span.col.saturating_sub(1) as usize);
            let width = self.span.width().unwrap_or(1).max(1) as usize;
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", self.span.line, line_text));
            output.push_str(&format!("  | {}^{}\n", indent, "~".repeat(width - 1)));
        }

        output
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::InvalidToken, error.span(), error.to_string())
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised by the semantic passes and the code generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name declared twice in one scope, or a function declared twice.
    #[error("at {span}: duplicate identifier '{name}'")]
    DuplicateIdentifier {
        /// The redeclared name.
        name: String,
        /// Where the second declaration occurred.
        span: Span,
    },

    /// A name with no visible declaration.
    #[error("at {span}: undefined symbol '{name}'")]
    UndefinedSymbol {
        /// The name that wasn't found.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// Operand, assignment or return types disagree.
    #[error("at {span}: {message}")]
    TypeMismatch {
        /// What disagreed with what.
        message: String,
        /// The offending node.
        span: Span,
    },

    /// A call passes the wrong number of arguments.
    #[error("at {span}: '{name}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        /// The called function.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
        /// The call expression.
        span: Span,
    },

    /// The program declares no `main` function.
    #[error("at {span}: no function named 'main'")]
    MissingEntryPoint {
        /// Span of the whole program.
        span: Span,
    },

    /// A later pass ran on a tree an earlier pass did not annotate.
    #[error("internal compiler error at {span}: {message}")]
    Internal {
        /// What was missing.
        message: String,
        /// The node being processed.
        span: Span,
    },
}

impl CompilationError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::DuplicateIdentifier { span, .. } => *span,
            CompilationError::UndefinedSymbol { span, .. } => *span,
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::ArityMismatch { span, .. } => *span,
            CompilationError::MissingEntryPoint { span } => *span,
            CompilationError::Internal { span, .. } => *span,
        }
    }

    /// Shorthand for a [`CompilationError::TypeMismatch`].
    pub fn type_mismatch(span: Span, message: impl Into<String>) -> Self {
        CompilationError::TypeMismatch {
            message: message.into(),
            span,
        }
    }

    /// Shorthand for a [`CompilationError::Internal`].
    pub fn internal(span: Span, message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
            span,
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised while interpreting an instruction sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Two labels with the same name.
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    /// A jump or call to a label that was never defined.
    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    /// An indirect jump to an address outside the program.
    #[error("jump target {target} is outside the program")]
    BadJumpTarget {
        /// The register value that was jumped to.
        target: i64,
    },

    /// A load or store outside the machine's memory.
    #[error("memory access at address {address} is out of bounds (size {size})")]
    OutOfBounds {
        /// The faulting address.
        address: i64,
        /// Memory size in words.
        size: usize,
    },

    /// `Div` with a zero right operand.
    #[error("division by zero")]
    DivisionByZero,

    /// The configured step limit was reached before `Halt`.
    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded {
        /// The configured limit.
        limit: u64,
    },

    /// Execution ran off the end of the program without halting.
    #[error("program ended without reaching Halt")]
    MissingHalt,
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for the whole toolchain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TauError {
    /// A parse error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Rejected by a compiler pass.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// A runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl TauError {
    /// The source did not parse.
    pub fn is_parse(&self) -> bool {
        matches!(self, TauError::Parse(_))
    }

    /// A compiler pass rejected the program.
    pub fn is_compilation(&self) -> bool {
        matches!(self, TauError::Compilation(_))
    }

    /// The interpreter stopped with an error.
    pub fn is_runtime(&self) -> bool {
        matches!(self, TauError::Runtime(_))
    }
}

impl From<LexError> for TauError {
    fn from(error: LexError) -> Self {
        TauError::Parse(error.into())
    }
}
