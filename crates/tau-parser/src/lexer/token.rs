//! Token types for the Tau scanner.

use std::fmt;

use tau_core::Span;

/// One scanned token: its kind, its text and where it was found.
///
/// The lexeme lives in the arena, so tokens outlive the source string.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// Which token this is.
    pub kind: TokenKind,
    /// Text as written, copied into the arena.
    pub lexeme: &'ast str,
    /// Where it starts and ends.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types in Tau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals and names
    // =========================================
    /// Decimal integer literal: `42`
    IntLiteral,
    /// Any name that is not a keyword
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    Func,
    Var,
    If,
    Else,
    While,
    Print,
    Call,
    Return,
    True,
    False,
    And,
    Or,
    Not,
    Int,
    Bool,
    Void,

    // =========================================
    // Operators
    // =========================================
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,

    // =========================================
    // Delimiters
    // =========================================
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Whether this is a reserved word.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Func | Var
                | If
                | Else
                | While
                | Print
                | Call
                | Return
                | True
                | False
                | And
                | Or
                | Not
                | Int
                | Bool
                | Void
        )
    }

    /// A short human-readable description used in parse errors.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            Identifier => "identifier",
            Func => "'func'",
            Var => "'var'",
            If => "'if'",
            Else => "'else'",
            While => "'while'",
            Print => "'print'",
            Call => "'call'",
            Return => "'return'",
            True => "'true'",
            False => "'false'",
            And => "'and'",
            Or => "'or'",
            Not => "'not'",
            Int => "'int'",
            Bool => "'bool'",
            Void => "'void'",
            Assign => "'='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            Equal => "'=='",
            NotEqual => "'!='",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftBracket => "'['",
            RightBracket => "']'",
            Comma => "','",
            Colon => "':'",
            Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// The keyword spelled `ident`, if it is one.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "func" => Func,
        "var" => Var,
        "if" => If,
        "else" => Else,
        "while" => While,
        "print" => Print,
        "call" => Call,
        "return" => Return,
        "true" => True,
        "false" => False,
        "and" => And,
        "or" => Or,
        "not" => Not,
        "int" => Int,
        "bool" => Bool,
        "void" => Void,
        _ => return None,
    })
}
