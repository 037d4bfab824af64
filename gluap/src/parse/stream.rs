//! Positioned token streams.

use crate::span::{Pos, Span, Spanned};
use crate::tok::{Comment, Token};

/// An index into a [`TokenStream`].
///
/// Cursors are plain indices, so saving and restoring one is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An immutable sequence of tokens, consumed through [`Cursor`]s.
///
/// The position of a cursor is the start of the token it points at, so after advancing past a
/// token the reported position is that of the next one. Past the last token, it is the end of the
/// source.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Spanned<Token>>,
    end: Pos,
}

impl TokenStream {
    /// Create a stream ending at `end`.
    pub fn new(tokens: Vec<Spanned<Token>>, end: Pos) -> Self {
        Self { tokens, end }
    }

    /// Create a stream ending where its last token ends.
    pub fn from_tokens(tokens: Vec<Spanned<Token>>) -> Self {
        let end = tokens.last().map_or_else(Pos::default, |tok| tok.span.end);
        Self::new(tokens, end)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn start(&self) -> Cursor {
        Cursor(0)
    }

    /// The cursor just past the last token.
    pub fn end(&self) -> Cursor {
        Cursor(self.tokens.len())
    }

    pub fn get(&self, cursor: Cursor) -> Option<&Spanned<Token>> {
        self.tokens.get(cursor.0)
    }

    /// The token at `cursor` and the cursor following it.
    pub fn next(&self, cursor: Cursor) -> Option<(&Spanned<Token>, Cursor)> {
        let tok = self.get(cursor)?;
        Some((tok, Cursor(cursor.0 + 1)))
    }

    /// The position of the first unconsumed input at `cursor`.
    pub fn pos(&self, cursor: Cursor) -> Pos {
        self.get(cursor).map_or(self.end, |tok| tok.span.start)
    }

    /// The span covering the tokens from `start` up to, but not including, `end`.
    ///
    /// An empty range gives an empty span at the position of `start`.
    pub fn span_between(&self, start: Cursor, end: Cursor) -> Span {
        if end <= start {
            return Span::point(self.pos(start));
        }
        match (self.get(start), self.get(Cursor(end.0 - 1))) {
            (Some(first), Some(last)) => first.span.join(last.span),
            _ => Span::point(self.pos(start)),
        }
    }
}

/// Separate comment tokens from the rest of a token list.
///
/// Both lists keep their relative order.
pub fn split_comments(
    tokens: Vec<Spanned<Token>>,
) -> (Vec<Spanned<Comment>>, Vec<Spanned<Token>>) {
    let mut comments = Vec::new();
    let mut rest = Vec::with_capacity(tokens.len());

    for tok in tokens {
        match tok.node {
            Token::Comment(comment) => comments.push(Spanned {
                node: comment,
                span: tok.span,
            }),
            node => rest.push(Spanned {
                node,
                span: tok.span,
            }),
        }
    }

    (comments, rest)
}
