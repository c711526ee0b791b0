/// A cursor over source text that tracks line and column.
///
/// Tau source is ASCII in practice, but the cursor steps whole characters so
/// a stray multi-byte character is reported rather than split.
pub struct Cursor<'src> {
    /// Whole input.
    source: &'src str,
    /// Byte position of the next character.
    offset: usize,
    /// Line of the next character, from 1.
    line: u32,
    /// Byte column of the next character, from 1.
    column: u32,
}

impl<'src> Cursor<'src> {
    /// A cursor before the first character of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current `(line, column)` pair.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    #[inline]
    fn rest(&self) -> &'src str {
        &self.source[self.offset..]
    }

    /// The next character, left in place.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Check if the upcoming text matches `s`.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consume the current character, updating line/column tracking.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += ch.len_utf8() as u32;
        }
        Some(ch)
    }

    /// Step over `ch` if it comes next.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate matches and return them.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.peek().is_some_and(&f) {
            self.advance();
        }
        &self.source[start..self.offset]
    }
}

/// First character of a name.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Any later character of a name.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.advance(), Some('b'));
        assert!(cursor.is_eof());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("x\n  y");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), (2, 1));
        cursor.eat_while(|c| c == ' ');
        assert_eq!(cursor.position(), (2, 3));
        assert_eq!(cursor.peek(), Some('y'));
    }

    #[test]
    fn eat_while_returns_slice() {
        let mut cursor = Cursor::new("count1 = 3");
        assert_eq!(cursor.eat_while(is_ident_continue), "count1");
        assert!(cursor.eat(' '));
        assert!(cursor.check_str("= 3"));
    }
}
