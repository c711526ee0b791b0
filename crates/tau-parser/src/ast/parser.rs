//! Parser infrastructure for Tau.
//!
//! Provides the main [`Parser`] struct with token navigation. The grammar
//! itself is split across `decl_parser`, `stmt_parser` and `expr_parser`.

use bumpalo::Bump;
use tau_core::{ParseError, ParseErrorKind, Span};

use crate::ast::Program;
use crate::lexer::{Lexer, Token, TokenKind};

/// The recursive-descent parser for Tau source code.
///
/// The whole source is tokenized up front; the parser then walks the token
/// buffer and stops at the first error. AST nodes and lexemes are allocated
/// in `arena`, so the source string only needs to live during [`new`].
///
/// [`new`]: Parser::new
pub struct Parser<'ast> {
    /// All tokens of the source, ending with `Eof`.
    pub(super) buffer: Vec<Token<'ast>>,
    /// Current position in the buffer.
    pub(super) position: usize,
    /// Arena allocator for AST nodes.
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Tokenize `source` and create a parser over it.
    pub fn new(source: &str, arena: &'ast Bump) -> Result<Self, ParseError> {
        let buffer = Lexer::new(source, arena).tokenize()?;
        Ok(Self {
            buffer,
            position: 0,
            arena,
        })
    }

    /// Parse a complete program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<&'ast Program<'ast>, ParseError> {
        let mut parser = Parser::new(source, arena)?;
        parser.parse_program()
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek ahead `n` tokens; past the end this keeps returning `Eof`.
    pub fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len().saturating_sub(1);
        self.buffer
            .get((self.position + n).min(last))
            .copied()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", Span::default()))
    }

    /// Get the current token and advance to the next.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if !token.is_eof() {
            self.position += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// If the current token matches the given kind, consume it and return Some.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = self.peek();
        if token.is_eof() {
            Err(ParseError::unexpected_eof(token.span, kind.description()))
        } else {
            Err(ParseError::expected_token(
                token.span,
                kind.description(),
                token.kind.description(),
            ))
        }
    }

    /// Build an error of `kind` pointing at the current token.
    pub(super) fn error_here(&self, kind: ParseErrorKind, expected: &str) -> ParseError {
        let token = self.peek();
        if token.is_eof() {
            ParseError::unexpected_eof(token.span, expected)
        } else {
            ParseError::new(
                kind,
                token.span,
                format!("expected {expected}, found {}", token.kind),
            )
        }
    }
}
