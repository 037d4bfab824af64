//! Parsing primitives with least-cost local repair.
//!
//! Every rule runs either *committed* or *speculatively*. A committed rule must produce a value:
//! when a matcher finds the wrong token, it synthesizes the token it wanted, records a diagnostic,
//! and carries on. A speculative rule that fails before consuming anything instead reports
//! [`Stuck`], leaving no trace, so that an enclosing choice can try something else. A speculative
//! rule becomes committed as soon as it consumes a token.

use super::error::{Expected, PResult, ParseDiag, Repair, Stuck};
use super::stream::Cursor;
use super::Parser;
use crate::span::{Pos, Span, Spannable, Spanned};
use crate::tok::Token;

/// How failures are handled by the rule currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Speculation {
    /// Failures are always repaired.
    Committed,

    /// Failures are reported as [`Stuck`] while the cursor is still here, and repaired after.
    From(Cursor),

    /// Failures are always reported as [`Stuck`]. Used for lookahead.
    Strict,
}

/// A saved parser state.
#[derive(Debug, Clone, Copy)]
pub(super) struct Mark {
    cursor: Cursor,
    diags: usize,
}

/// A grammar rule that can be handed to [`Parser::alt`].
pub(super) type Rule<'a, T> = &'a dyn Fn(&mut Parser) -> PResult<T>;

// Utility
impl Parser {
    pub(super) fn committed(&self) -> bool {
        match self.mode {
            Speculation::Committed => true,
            Speculation::From(start) => start != self.cursor,
            Speculation::Strict => false,
        }
    }

    pub(super) fn mark(&self) -> Mark {
        Mark {
            cursor: self.cursor,
            diags: self.diags.len(),
        }
    }

    /// Rewind to `mark`, forgetting any diagnostics recorded since.
    pub(super) fn reset(&mut self, mark: Mark) {
        self.cursor = mark.cursor;
        self.diags.truncate(mark.diags);
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.stream.get(self.cursor).map(|tok| &tok.node)
    }

    pub(super) fn check(&self, test: impl FnOnce(&Token) -> bool) -> bool {
        self.peek().is_some_and(test)
    }

    pub(super) fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// The position of the first unconsumed token.
    pub(super) fn pos(&self) -> Pos {
        self.stream.pos(self.cursor)
    }

    /// The span of everything consumed since `start`.
    pub(super) fn span_from(&self, start: Cursor) -> Span {
        self.stream.span_between(start, self.cursor)
    }

    /// Advance over one token.
    fn bump(&mut self) -> Option<Spanned<Token>> {
        let (tok, next) = self.stream.next(self.cursor)?;
        let tok = tok.clone();
        self.cursor = next;
        log::trace!("consumed {} at {}, next at {}", tok.node.describe(), tok.span.start, self.pos());
        Some(tok)
    }

    /// Skip `count` tokens, recording a single diagnostic for the run.
    pub(super) fn skip_tokens(&mut self, count: usize, expected: Vec<Expected>) {
        let start = self.cursor;
        let found = self.peek().cloned();
        let mut skipped = 0;
        while skipped < count && self.bump().is_some() {
            skipped += 1;
        }
        if skipped == 0 {
            return;
        }

        let span = self.span_from(start);
        log::debug!("{}: skipping {skipped} token(s)", span.start);
        self.diags.push(ParseDiag::unexpected(
            span,
            found,
            expected,
            Repair::Skipped { count: skipped },
        ));
    }

    /// Whether one more level of nesting would pass the limit.
    pub(super) fn too_deep(&self) -> bool {
        self.depth >= self.max_depth
    }

    /// Run `rule` one nesting level down.
    pub(super) fn deeper<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.depth += 1;
        let res = rule(self);
        self.depth -= 1;
        res
    }

    /// Skip to the end of the current nesting level, recording a single diagnostic.
    ///
    /// The level ends before the first closing token with no opener among the skipped tokens, or
    /// with `separators`, before a `,` or `;` outside any nesting. Yields the span of the skipped
    /// tokens, or `None` if there were none.
    pub(super) fn skip_too_deep(&mut self, separators: bool) -> Option<Span> {
        let mut count = 0;
        let mut level = 0usize;
        let mut cursor = self.cursor;
        while let Some((tok, next)) = self.stream.next(cursor) {
            let tok = &tok.node;
            let ends_level = tok.closes_nesting()
                || tok.is_block_end()
                || (separators && matches!(tok, Token::Comma | Token::Semicolon));
            if level == 0 && ends_level {
                break;
            }
            if tok.opens_nesting() {
                level += 1;
            } else if tok.closes_nesting() {
                level -= 1;
            }
            count += 1;
            cursor = next;
        }
        if count == 0 {
            return None;
        }

        let start = self.cursor;
        self.cursor = cursor;
        let span = self.span_from(start);
        log::debug!("{}: nesting limit reached, skipping {count} token(s)", span.start);
        self.diags.push(ParseDiag::too_deep(
            span,
            self.max_depth,
            Repair::Skipped { count },
        ));
        Some(span)
    }

    /// The failure of a matcher: repair when committed, stuck otherwise.
    fn fail<T>(
        &mut self,
        expected: Expected,
        repair: Token,
        accept: impl FnOnce(&Token) -> Option<T>,
    ) -> PResult<Spanned<T>> {
        let cost = repair.insertion_cost();
        if !self.committed() {
            return Err(Stuck::new(expected, cost));
        }
        let Some(node) = accept(&repair) else {
            return Err(Stuck::new(expected, cost));
        };

        let pos = self.pos();
        let found = self.stream.get(self.cursor).cloned();
        let span = found.as_ref().map_or(Span::point(pos), |tok| tok.span);
        let expected = self.hint.take().unwrap_or_else(|| vec![expected]);

        log::debug!("{pos}: inserting `{repair}` (cost {cost})");
        self.diags.push(ParseDiag::unexpected(
            span,
            found.map(|tok| tok.node),
            expected,
            Repair::Inserted {
                token: repair.to_string(),
                cost,
            },
        ));

        Ok(node.spanned(Span::point(pos)))
    }
}

// Combinators
impl Parser {
    /// Match a single token.
    ///
    /// `accept` recognizes the token and extracts a value from it. On a mismatch, `repair` is the
    /// token that gets synthesized; `accept` must recognize it.
    pub(super) fn satisfy<T>(
        &mut self,
        expected: Expected,
        repair: Token,
        accept: impl Fn(&Token) -> Option<T>,
    ) -> PResult<Spanned<T>> {
        if let Some(node) = self.peek().and_then(&accept) {
            let span = self.stream.get(self.cursor).map(|tok| tok.span).unwrap_or_default();
            self.bump();
            return Ok(node.spanned(span));
        }
        self.fail(expected, repair, accept)
    }

    /// Try each alternative in turn, committing to the first one that succeeds.
    ///
    /// If every alternative is stuck and this choice is committed, the alternative whose repair is
    /// cheapest (earliest on ties) is run again, committed. Its diagnostic lists everything any of
    /// the alternatives expected.
    pub(super) fn alt<T>(&mut self, alts: &[Rule<T>]) -> PResult<T> {
        let outer = self.mode;
        let committed = self.committed();
        let start = self.mark();

        self.mode = match outer {
            Speculation::Strict => Speculation::Strict,
            _ => Speculation::From(self.cursor),
        };

        let mut best: Option<(usize, u32)> = None;
        let mut expected: Vec<Expected> = Vec::new();

        for (idx, alt) in alts.iter().enumerate() {
            match alt(self) {
                Ok(val) => {
                    self.mode = outer;
                    return Ok(val);
                }
                Err(stuck) => {
                    log::trace!("{}: alternative {idx} stuck (cost {})", self.pos(), stuck.cost);
                    self.reset(start);
                    if best.map_or(true, |(_, cost)| stuck.cost < cost) {
                        best = Some((idx, stuck.cost));
                    }
                    for exp in stuck.expected {
                        if !expected.contains(&exp) {
                            expected.push(exp);
                        }
                    }
                }
            }
        }

        self.mode = outer;

        let Some((idx, cost)) = best else {
            return Err(Stuck {
                expected,
                cost: u32::MAX,
            });
        };

        if !committed {
            return Err(Stuck { expected, cost });
        }

        log::trace!("{}: repairing with alternative {idx}", self.pos());
        let set_hint = self.hint.is_none();
        if set_hint {
            self.hint = Some(expected);
        }
        let res = alts[idx](self);
        if set_hint {
            self.hint = None;
        }
        res
    }

    /// Run `rule` speculatively, yielding `None` if it is stuck.
    pub(super) fn optional<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let outer = self.mode;
        let start = self.mark();

        self.mode = match outer {
            Speculation::Strict => Speculation::Strict,
            _ => Speculation::From(self.cursor),
        };
        let res = rule(self);
        self.mode = outer;

        match res {
            Ok(val) => Some(val),
            Err(_) => {
                self.reset(start);
                None
            }
        }
    }

    /// Run `rule` speculatively as many times as it succeeds while consuming input.
    pub(super) fn many<T>(&mut self, rule: impl Fn(&mut Self) -> PResult<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let before = self.cursor;
            match self.optional(&rule) {
                Some(item) if self.cursor != before => items.push(item),
                _ => break,
            }
        }
        items
    }

    /// One or more `item`s separated by `sep`.
    pub(super) fn sep_by1<T, S>(
        &mut self,
        item: impl Fn(&mut Self) -> PResult<T>,
        sep: impl Fn(&mut Self) -> PResult<S>,
    ) -> PResult<Vec<T>> {
        let first = item(self)?;
        let mut items = vec![first];
        items.extend(self.many(|p| {
            sep(p)?;
            item(p)
        }));
        Ok(items)
    }

    /// Run `rule` as pure lookahead when speculative: it never repairs, and is rewound entirely if
    /// it gets stuck anywhere. When committed, `rule` runs normally.
    pub(super) fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.committed() {
            return rule(self);
        }

        let outer = self.mode;
        let start = self.mark();
        self.mode = Speculation::Strict;
        let res = rule(self);
        self.mode = outer;

        if res.is_err() {
            self.reset(start);
        }
        res
    }
}

// Matchers
impl Parser {
    /// Match one exact token.
    pub(super) fn sym(&mut self, tok: Token) -> PResult<Span> {
        let res = self.satisfy(Expected::Token(tok.clone()), tok.clone(), |t| {
            (*t == tok).then_some(())
        })?;
        Ok(res.span)
    }

    /// Match any of `toks`, yielding the value paired with it. The first token is the repair.
    pub(super) fn one_of<T: Copy>(&mut self, toks: &[(Token, T)]) -> PResult<Spanned<T>> {
        let Some((first, _)) = toks.first() else {
            return Err(Stuck::new(Expected::Named("nothing"), u32::MAX));
        };
        self.satisfy(Expected::Token(first.clone()), first.clone(), |t| {
            toks.iter().find(|(tok, _)| tok == t).map(|&(_, val)| val)
        })
    }

    pub(super) fn name(&mut self) -> PResult<Spanned<String>> {
        self.satisfy(
            Expected::Named("identifier"),
            Token::Ident("someVariable".into()),
            |t| match t {
                Token::Ident(name) => Some(name.clone()),
                _ => None,
            },
        )
    }

    pub(super) fn string(&mut self) -> PResult<Spanned<String>> {
        self.satisfy(
            Expected::Named("string literal"),
            Token::Str("\"someString\"".into()),
            |t| match t {
                Token::Str(s) => Some(s.clone()),
                _ => None,
            },
        )
    }

    pub(super) fn number(&mut self) -> PResult<Spanned<String>> {
        self.satisfy(
            Expected::Named("number"),
            Token::Number("0".into()),
            |t| match t {
                Token::Number(n) => Some(n.clone()),
                _ => None,
            },
        )
    }

    pub(super) fn label(&mut self) -> PResult<Spanned<String>> {
        self.satisfy(
            Expected::Named("label"),
            Token::Label("someLabel".into()),
            |t| match t {
                Token::Label(name) => Some(name.clone()),
                _ => None,
            },
        )
    }

    /// Match the end of input.
    ///
    /// When committed, any remaining tokens are skipped with a single diagnostic.
    pub(super) fn end_of_input(&mut self) -> PResult<()> {
        if self.at_end() {
            return Ok(());
        }
        if !self.committed() {
            return Err(Stuck::new(Expected::Named("end of input"), 0));
        }

        let remaining = self.stream.len() - self.cursor.index();
        self.skip_tokens(remaining, vec![Expected::Named("end of input")]);
        Ok(())
    }
}
