//! Source positions and spans.

use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// A point in the source text.
///
/// Lines and columns are zero-based; columns count characters, not bytes. `offset` is the byte
/// offset from the start of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Pos {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let val = format!("{}:{}", self.line + 1, self.column + 1);
        f.pad(&val)
    }
}

/// A contiguous region of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `pos`.
    ///
    /// Synthesized tokens and padding expressions get spans of this kind.
    pub const fn point(pos: Pos) -> Self {
        Self::new(pos, pos)
    }

    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// The byte range covered by this span.
    pub const fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    /// The smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A value annotated with the span of source it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            node: f(self.node),
            span: self.span,
        }
    }
}

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

/// Extension trait attaching spans to arbitrary values.
pub trait Spannable: Sized {
    fn spanned(self, span: Span) -> Spanned<Self> {
        Spanned { node: self, span }
    }
}

impl<T: Sized> Spannable for T {}
