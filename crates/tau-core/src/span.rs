//! Source location tracking for diagnostics.
//!
//! Every AST node carries a [`Span`] from the scanner. The passes never look
//! inside it; they only copy it into errors so a driver can point at the
//! offending source.

use std::fmt;

/// A region of source text, from the first character of a node up to (but
/// not including) the character after its last one.
///
/// Lines and columns are 1-indexed; columns count bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line of the first character.
    pub line: u32,
    /// Column of the first character.
    pub col: u32,
    /// Line of the end position.
    pub end_line: u32,
    /// Column one past the last character.
    pub end_col: u32,
}

impl Span {
    /// Create a span covering `len` bytes on a single line.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self {
            line,
            col,
            end_line: line,
            end_col: col + len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    /// Create a span between two positions.
    #[inline]
    pub fn between(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            line: start.0,
            col: start.1,
            end_line: end.0,
            end_col: end.1,
        }
    }

    /// Whether the span covers no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line == self.end_line && self.col == self.end_col
    }

    /// Width in bytes when the span sits on one line, `None` otherwise.
    #[inline]
    pub fn width(&self) -> Option<u32> {
        (self.line == self.end_line).then(|| self.end_col.saturating_sub(self.col))
    }

    /// Whether `other` lies entirely within `self`.
    #[inline]
    pub fn contains(&self, other: Span) -> bool {
        (self.line, self.col) <= (other.line, other.col)
            && (other.end_line, other.end_col) <= (self.end_line, self.end_col)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let start = (self.line, self.col).min((other.line, other.col));
        let end = (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::between(start, end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.line, self.col, self.end_line, self.end_col
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(1, 5, 10);
        assert_eq!(span.width(), Some(10));
        assert!(!span.is_empty());

        let empty = Span::point(1, 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn span_display() {
        let span = Span::new(3, 15, 5);
        assert_eq!(format!("{}", span), "3:15");
        assert_eq!(format!("{:?}", span), "3:15-3:20");
    }

    #[test]
    fn span_merge_same_line() {
        let left = Span::new(1, 5, 3);
        let right = Span::new(1, 10, 3);
        let merged = left.merge(right);

        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
        assert_eq!(merged.width(), Some(8));
    }

    #[test]
    fn span_contains() {
        let outer = Span::between((2, 1), (6, 2));
        assert!(outer.contains(Span::new(3, 5, 4)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Span::new(6, 1, 4)));
        assert!(!outer.contains(Span::new(1, 3, 1)));
    }

    #[test]
    fn span_merge_is_order_independent() {
        let a = Span::new(1, 10, 3);
        let b = Span::new(1, 5, 3);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn span_merge_across_lines() {
        let func = Span::new(1, 1, 4);
        let close = Span::new(3, 1, 1);
        let merged = func.merge(close);

        assert_eq!((merged.line, merged.col), (1, 1));
        assert_eq!((merged.end_line, merged.end_col), (3, 2));
        assert_eq!(merged.width(), None);
    }
}
