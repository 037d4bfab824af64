//! Error recovery and diagnostic types for the parser.
//!
//! Control flow inside the parser is mediated by [`PResult`]s of [`Stuck`]. A `Stuck` only ever
//! travels as far as the nearest enclosing choice point; what the user actually sees is the list of
//! [`ParseDiag`]s accumulated along the way.

use std::fmt::{self, Display, Formatter};

use crate::diag::{Diag, DiagKind, Diagnostic};
use crate::span::Span;
use crate::tok::{LexError, LexErrorKind, Token};
use crate::util::oxford_or;

/// Result type for grammar rules.
pub type PResult<T> = Result<T, Stuck>;

/// A speculative rule could not make progress from where it started.
///
/// Carries what the rule would have needed to see next, and what it would cost to pretend it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stuck {
    pub(crate) expected: Vec<Expected>,
    pub(crate) cost: u32,
}

impl Stuck {
    pub(crate) fn new(expected: Expected, cost: u32) -> Self {
        Self {
            expected: vec![expected],
            cost,
        }
    }
}

/// Something the parser was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// One exact token.
    Token(Token),

    /// A class of tokens or a construct, like "identifier" or "statement".
    Named(&'static str),
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expected::Token(tok) => write!(f, "`{tok}`"),
            Expected::Named(name) => f.write_str(name),
        }
    }
}

/// A problem found while parsing, and what was done about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiag {
    /// Where the problem was found. Its start is the reported position.
    pub span: Span,
    pub cause: Cause,
    pub severity: DiagKind,
    pub repair: Repair,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// An unexpected token, or the end of input (`found: None`).
    Unexpected {
        found: Option<Token>,
        expected: Vec<Expected>,
    },

    /// A call used as an assignment target.
    NotAssignable,

    /// A parenthesized expression used as an assignment target, as in `(x) = 1`.
    ParenthesizedTarget,

    /// A lexical error.
    Lexical(LexErrorKind),

    /// The token stream was longer than the configured limit.
    TokenLimitExceeded { limit: usize, count: usize },

    /// Expressions or blocks nested deeper than the configured limit.
    TooDeep { limit: usize },
}

/// The repair the parser made to carry on past a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// A token was synthesized in the gap.
    Inserted { token: String, cost: u32 },

    /// Tokens were skipped over.
    Skipped { count: usize },

    /// Nothing was changed; the tree holds the construct as written.
    Unrepaired,
}

impl ParseDiag {
    pub fn unexpected(
        span: Span,
        found: Option<Token>,
        expected: Vec<Expected>,
        repair: Repair,
    ) -> Self {
        Self {
            span,
            cause: Cause::Unexpected { found, expected },
            severity: DiagKind::Error,
            repair,
        }
    }

    pub fn not_assignable(span: Span) -> Self {
        Self {
            span,
            cause: Cause::NotAssignable,
            severity: DiagKind::Error,
            repair: Repair::Unrepaired,
        }
    }

    pub fn parenthesized_target(span: Span) -> Self {
        Self {
            span,
            cause: Cause::ParenthesizedTarget,
            severity: DiagKind::Warning,
            repair: Repair::Unrepaired,
        }
    }

    pub fn lexical(err: LexError) -> Self {
        Self {
            span: err.span,
            cause: Cause::Lexical(err.kind),
            severity: DiagKind::Error,
            repair: Repair::Unrepaired,
        }
    }

    pub fn token_limit(span: Span, limit: usize, count: usize) -> Self {
        Self {
            span,
            cause: Cause::TokenLimitExceeded { limit, count },
            severity: DiagKind::Error,
            repair: Repair::Unrepaired,
        }
    }

    pub fn too_deep(span: Span, limit: usize, repair: Repair) -> Self {
        Self {
            span,
            cause: Cause::TooDeep { limit },
            severity: DiagKind::Error,
            repair,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagKind::Error
    }

    /// The synthesized token, if this diagnostic was repaired by insertion.
    pub fn inserted(&self) -> Option<&str> {
        match &self.repair {
            Repair::Inserted { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match &self.cause {
            Cause::Unexpected {
                found: Some(tok), ..
            } => format!("unexpected {}", tok.describe()),
            Cause::Unexpected { found: None, .. } => "unexpected end of input".into(),
            Cause::NotAssignable => "cannot assign to the result of a call".into(),
            Cause::ParenthesizedTarget => "parenthesized assignment target".into(),
            Cause::Lexical(kind) => kind.to_string(),
            Cause::TokenLimitExceeded { limit, count } => {
                format!("input has {count} tokens, more than the limit of {limit}")
            }
            Cause::TooDeep { limit } => format!("nesting is deeper than {limit} levels"),
        }
    }

    fn label(&self) -> String {
        match (&self.cause, &self.repair) {
            (_, Repair::Inserted { token, .. }) => format!("inserted `{token}` here"),
            (_, Repair::Skipped { count: 1 }) => "skipped this token".into(),
            (_, Repair::Skipped { count }) => format!("skipped these {count} tokens"),
            (Cause::NotAssignable, _) => "this is a call".into(),
            (Cause::ParenthesizedTarget, _) => "parentheses around this target".into(),
            (Cause::TokenLimitExceeded { .. }, _) => "limit reached here".into(),
            _ => "here".into(),
        }
    }
}

impl Display for ParseDiag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.span.start, self.message())?;
        if let Cause::Unexpected { expected, .. } = &self.cause {
            if !expected.is_empty() {
                write!(f, ", expected {}", oxford_or(expected))?;
            }
        }
        Ok(())
    }
}

impl Diagnostic for ParseDiag {
    fn into_diag(self) -> Diag {
        let mut diag =
            Diag::new(self.severity, self.message()).with_primary(self.span, self.label());

        match &self.cause {
            Cause::Unexpected { expected, .. } if !expected.is_empty() => {
                diag = diag.with_note(format!("expected {}", oxford_or(expected)));
            }
            Cause::NotAssignable => {
                diag = diag.with_note("only names, fields and indexes can be assigned to");
            }
            Cause::ParenthesizedTarget => {
                diag = diag.with_note("the parentheses are ignored");
            }
            Cause::TooDeep { .. } => {
                diag = diag.with_note("the innermost levels are left out of the tree");
            }
            _ => {}
        }

        if let Repair::Inserted { cost, .. } = self.repair {
            diag = diag.with_note(format!("repair cost {cost}"));
        }

        diag
    }
}
