//! Main lexer implementation for Tau.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, dispatching
//! on the first character of each token. Lexemes are copied into the arena so
//! the source string can be dropped once parsing finishes.
//!
//! Scanning is fail-fast: the first bad character ends the stream with a
//! [`LexError`].

use bumpalo::Bump;
use tau_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for Tau source code.
///
/// The `'src` lifetime is the source string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated.
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Source text, for slicing lexemes.
    source: &'src str,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            arena,
        }
    }

    /// Consume and return the next token.
    ///
    /// Once the input is exhausted every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token<'ast>, LexError> {
        self.scan_token()
    }

    /// Scan the whole input, stopping at the first error.
    pub fn tokenize(mut self) -> Result<Vec<Token<'ast>>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Result<Token<'ast>, LexError> {
        self.skip_trivia();

        let start = self.cursor.position();
        let start_offset = self.cursor.offset();

        let Some(c) = self.cursor.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::point(start.0, start.1)));
        };

        match c {
            c if c.is_ascii_digit() => self.scan_number(start, start_offset),
            c if is_ident_start(c) => Ok(self.scan_identifier(start, start_offset)),
            _ => self.scan_operator(start, start_offset),
        }
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_ascii_whitespace());
            if self.cursor.check_str("//") {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                return;
            }
        }
    }

    /// Create a token from `start` to the current position, copying the
    /// lexeme into the arena.
    fn make_token(&self, kind: TokenKind, start: (u32, u32), start_offset: usize) -> Token<'ast> {
        let text = &self.source[start_offset..self.cursor.offset()];
        let span = Span::new(start.0, start.1, text.len() as u32);
        Token::new(kind, self.arena.alloc_str(text), span)
    }

    fn scan_number(&mut self, start: (u32, u32), start_offset: usize) -> Result<Token<'ast>, LexError> {
        let digits = self.cursor.eat_while(|c| c.is_ascii_digit());
        if let Err(e) = digits.parse::<i64>() {
            return Err(LexError::InvalidNumber {
                span: Span::new(start.0, start.1, digits.len() as u32),
                detail: e.to_string(),
            });
        }
        Ok(self.make_token(TokenKind::IntLiteral, start, start_offset))
    }

    fn scan_identifier(&mut self, start: (u32, u32), start_offset: usize) -> Token<'ast> {
        let text = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start, start_offset)
    }

    fn scan_operator(&mut self, start: (u32, u32), start_offset: usize) -> Result<Token<'ast>, LexError> {
        let Some(c) = self.cursor.advance() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::point(start.0, start.1)));
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            (',', _) => TokenKind::Comma,
            (':', _) => TokenKind::Colon,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,

            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', _) => TokenKind::Less,
            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', _) => TokenKind::Greater,
            ('=', Some('=')) => { self.cursor.advance(); TokenKind::Equal }
            ('=', _) => TokenKind::Assign,
            ('!', Some('=')) => { self.cursor.advance(); TokenKind::NotEqual }

            (ch, _) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    span: Span::new(start.0, start.1, ch.len_utf8() as u32),
                });
            }
        };

        Ok(self.make_token(kind, start, start_offset))
    }
}
