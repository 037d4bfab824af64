//! Expression grammar.
//!
//! ```text
//! expr     -> or
//! or       -> and ( ('or' | '||') and )*
//! and      -> cmp ( ('and' | '&&') cmp )*
//! cmp      -> concat ( ('<' | '>' | '<=' | '>=' | '~=' | '!=' | '==') concat )*
//! concat   -> additive ( '..' concat )?
//! additive -> mult ( ('+' | '-') mult )*
//! mult     -> unary ( ('*' | '/' | '%') unary )*
//! unary    -> ('-' | 'not' | '!' | '#') unary | pow
//! pow      -> atom ( '^' unary )?
//! atom     -> 'nil' | 'false' | 'true' | NUMBER | STRING | '...' | function
//!           | prefixexp | table
//!
//! prefixexp -> head suffix*
//! head      -> NAME | '(' expr ')'
//! suffix    -> args | ':' NAME args | '[' expr ']' | '.' NAME
//! args      -> '(' exprlist? ')' | table | STRING
//! ```

use super::combinator::Mark;
use super::error::{Expected, PResult, ParseDiag, Repair, Stuck};
use super::Parser;
use crate::span::{Span, Spannable, Spanned};
use crate::syn::{expr, Args, BinOp, Expr, Field, FuncBody, Head, Name, PrefixExp, Suffix, UnOp};
use crate::tok::Token;

/// Which suffix chains a prefix expression may end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixPolicy {
    /// Any chain, including none.
    Unrestricted,

    /// A non-empty chain ending in a call.
    CallTerminated,

    /// An empty chain, or one ending in an index.
    IndexTerminated,
}

impl SuffixPolicy {
    /// The length of the longest prefix of `chain` this policy accepts.
    fn accepted_len(self, chain: &[Spanned<Suffix>]) -> usize {
        let last = |pred: fn(&Suffix) -> bool| {
            chain
                .iter()
                .rposition(|s| pred(&s.node))
                .map_or(0, |idx| idx + 1)
        };
        match self {
            SuffixPolicy::Unrestricted => chain.len(),
            SuffixPolicy::CallTerminated => last(Suffix::is_call),
            SuffixPolicy::IndexTerminated => last(Suffix::is_index),
        }
    }
}

/// What one more step of a suffix chain turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChainStep {
    ContinuesAsCall,
    ContinuesAsIndex,
    TerminatesChain,
}

const OR_OPS: &[(Token, BinOp)] = &[(Token::Or, BinOp::Or), (Token::PipePipe, BinOp::Or)];

const AND_OPS: &[(Token, BinOp)] = &[(Token::And, BinOp::And), (Token::AmpAmp, BinOp::And)];

const CMP_OPS: &[(Token, BinOp)] = &[
    (Token::Less, BinOp::Lt),
    (Token::Greater, BinOp::Gt),
    (Token::LessEqual, BinOp::Le),
    (Token::GreaterEqual, BinOp::Ge),
    (Token::TildeEqual, BinOp::Ne),
    (Token::BangEqual, BinOp::Ne),
    (Token::EqualEqual, BinOp::Eq),
];

const ADD_OPS: &[(Token, BinOp)] = &[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Sub)];

const MUL_OPS: &[(Token, BinOp)] = &[
    (Token::Star, BinOp::Mul),
    (Token::Slash, BinOp::Div),
    (Token::Percent, BinOp::Mod),
];

const UN_OPS: &[(Token, UnOp)] = &[
    (Token::Minus, UnOp::Neg),
    (Token::Not, UnOp::Not),
    (Token::Bang, UnOp::Not),
    (Token::Hash, UnOp::Len),
];

// Utility
impl Parser {
    /// Parse a left-associative chain of binary operators at one precedence level.
    fn left_assoc(
        &mut self,
        operand: impl Fn(&mut Self) -> PResult<Spanned<Expr>>,
        ops: &[(Token, BinOp)],
    ) -> PResult<Spanned<Expr>> {
        let mut lhs = operand(self)?;
        while let Some(op) = self.optional(|p| p.one_of(ops)) {
            let rhs = operand(self)?;
            lhs = expr::binop(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Stand in for an expression nested past the limit with `nil`, skipping its tokens.
    fn too_deep_expr(&mut self) -> PResult<Spanned<Expr>> {
        if let Some(span) = self.skip_too_deep(true) {
            return Ok(Expr::Nil.spanned(span));
        }

        let cost = Token::Nil.insertion_cost();
        if !self.committed() {
            return Err(Stuck::new(Expected::Named("expression"), cost));
        }
        let span = Span::point(self.pos());
        let repair = Repair::Inserted {
            token: Token::Nil.to_string(),
            cost,
        };
        self.diags.push(ParseDiag::too_deep(span, self.max_depth, repair));
        Ok(Expr::Nil.spanned(span))
    }

    /// Run `rule`, pairing its value with the span of everything it consumed.
    pub(super) fn spanned<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<Spanned<T>> {
        let start = self.cursor;
        let node = rule(self)?;
        Ok(node.spanned(self.span_from(start)))
    }
}

// Grammar
impl Parser {
    /// Parse an expression.
    ///
    /// Each call is one level of nesting. Past the limit, the rest of the level is skipped and
    /// stands as `nil`.
    pub fn expr(&mut self) -> PResult<Spanned<Expr>> {
        if self.too_deep() {
            return self.too_deep_expr();
        }
        self.deeper(|p| p.left_assoc(|p| p.and_expr(), OR_OPS))
    }

    /// Parse a comma-separated list of one or more expressions.
    pub fn expr_list(&mut self) -> PResult<Vec<Spanned<Expr>>> {
        self.sep_by1(Self::expr, |p| p.sym(Token::Comma))
    }

    fn and_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(|p| p.cmp_expr(), AND_OPS)
    }

    fn cmp_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(|p| p.concat_expr(), CMP_OPS)
    }

    /// Right-associative, so operands are collected first and folded from the right.
    fn concat_expr(&mut self) -> PResult<Spanned<Expr>> {
        let mut operands = vec![self.additive_expr()?];
        let mut ops = Vec::new();
        while let Some(op) = self.optional(|p| p.one_of(&[(Token::DotDot, BinOp::Concat)])) {
            ops.push(op);
            operands.push(self.additive_expr()?);
        }

        let mut rhs = operands.pop().unwrap_or_else(|| Expr::Nil.spanned(Span::point(self.pos())));
        while let (Some(op), Some(lhs)) = (ops.pop(), operands.pop()) {
            rhs = expr::binop(op, lhs, rhs);
        }
        Ok(rhs)
    }

    fn additive_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(|p| p.mult_expr(), ADD_OPS)
    }

    fn mult_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(|p| p.unary_expr(), MUL_OPS)
    }

    /// Unary operators and right-associative `^`, which binds tighter than a unary operator on
    /// its left and looser than one on its right.
    ///
    /// Parsed as a run of `unop* atom` segments joined by `^`, then folded from the right: each
    /// segment's operators apply to its atom raised to everything after it.
    fn unary_expr(&mut self) -> PResult<Spanned<Expr>> {
        let mut segments = Vec::new();
        let mut carets = Vec::new();
        loop {
            let unops = self.many(|p| p.one_of(UN_OPS));
            segments.push((unops, self.atom()?));
            match self.optional(|p| p.one_of(&[(Token::Caret, BinOp::Pow)])) {
                Some(op) => carets.push(op),
                None => break,
            }
        }

        let mut acc: Option<Spanned<Expr>> = None;
        while let Some((unops, base)) = segments.pop() {
            let mut value = base;
            if let Some(exp) = acc.take() {
                if let Some(op) = carets.pop() {
                    value = expr::binop(op, value, exp);
                }
            }
            for op in unops.into_iter().rev() {
                value = expr::unop(op, value);
            }
            acc = Some(value);
        }
        Ok(acc.unwrap_or_else(|| Expr::Nil.spanned(Span::point(self.pos()))))
    }

    fn literal(&mut self, tok: Token, node: Expr) -> PResult<Spanned<Expr>> {
        let span = self.sym(tok)?;
        Ok(node.spanned(span))
    }

    /// Parse an atomic expression.
    ///
    /// The order of the alternatives doubles as the repair order: a missing expression is
    /// repaired as `nil`.
    fn atom(&mut self) -> PResult<Spanned<Expr>> {
        self.alt(&[
            &|p: &mut Self| p.literal(Token::Nil, Expr::Nil),
            &|p: &mut Self| p.literal(Token::False, Expr::False),
            &|p: &mut Self| p.literal(Token::True, Expr::True),
            &|p: &mut Self| Ok(p.number()?.map(Expr::Number)),
            &|p: &mut Self| Ok(p.string()?.map(Expr::Str)),
            &|p: &mut Self| p.literal(Token::Ellipsis, Expr::Vararg),
            &|p: &mut Self| p.function_expr(),
            &|p: &mut Self| Ok(expr::prefix(p.prefix_exp(SuffixPolicy::Unrestricted)?)),
            &|p: &mut Self| Ok(p.table()?.map(Expr::Table)),
        ])
    }

    fn function_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.spanned(|p| {
            p.sym(Token::Function)?;
            Ok(Expr::Function(p.func_body()?))
        })
    }

    /// Parse a function's parameter list and body, from the opening parenthesis to `end`.
    pub(super) fn func_body(&mut self) -> PResult<FuncBody> {
        self.sym(Token::OpenParen)?;
        let (params, vararg) = self.params();
        self.sym(Token::CloseParen)?;
        let body = self.block()?;
        self.sym(Token::End)?;
        Ok(FuncBody {
            params,
            vararg,
            body,
        })
    }

    /// Parse parameter names, stopping after a `...`.
    fn params(&mut self) -> (Vec<Spanned<Name>>, Option<Span>) {
        let mut params = Vec::new();

        let mut next = self.optional(Self::param);
        while let Some(param) = next {
            match param {
                Ok(name) => params.push(name),
                Err(vararg) => return (params, Some(vararg)),
            }
            next = self.optional(|p| {
                p.sym(Token::Comma)?;
                p.param()
            });
        }

        (params, None)
    }

    /// A single parameter: a name, or the span of a `...`.
    fn param(&mut self) -> PResult<Result<Spanned<Name>, Span>> {
        self.alt(&[
            &|p: &mut Self| Ok(Ok(p.name()?)),
            &|p: &mut Self| Ok(Err(p.sym(Token::Ellipsis)?)),
        ])
    }

    /// Parse a prefix expression whose suffix chain satisfies `policy`.
    ///
    /// The chain is parsed greedily, then rewound to the longest prefix the policy accepts. A
    /// call-terminated chain with no call at all gets its arguments repaired when committed, and is
    /// stuck, rewound to before its head, when speculative.
    pub fn prefix_exp(&mut self, policy: SuffixPolicy) -> PResult<PrefixExp> {
        let before_head = self.mark();
        let speculative = !self.committed();
        let head = self.prefix_head()?;
        let after_head = self.mark();
        let (mut chain, marks) = self.suffix_chain();

        let keep = policy.accepted_len(&chain);
        if keep < chain.len() {
            log::trace!("{}: rewinding suffix chain to {keep} of {}", self.pos(), chain.len());
            let mark = keep
                .checked_sub(1)
                .and_then(|idx| marks.get(idx).copied())
                .unwrap_or(after_head);
            self.reset(mark);
            chain.truncate(keep);
        }

        if policy == SuffixPolicy::CallTerminated && chain.is_empty() {
            if speculative {
                log::trace!("{}: no call in chain", self.pos());
                self.reset(before_head);
                return Err(Stuck {
                    expected: vec![
                        Expected::Token(Token::OpenParen),
                        Expected::Token(Token::OpenBrace),
                        Expected::Named("string literal"),
                    ],
                    cost: Token::OpenParen.insertion_cost(),
                });
            }
            let args = self.args()?;
            chain.push(args.map(Suffix::Call));
        }

        Ok(PrefixExp::new(head, chain))
    }

    /// Parse a call: a prefix expression ending in a call suffix.
    pub fn call(&mut self) -> PResult<PrefixExp> {
        self.prefix_exp(SuffixPolicy::CallTerminated)
    }

    pub(super) fn prefix_head(&mut self) -> PResult<Spanned<Head>> {
        self.alt(&[
            &|p: &mut Self| Ok(p.name()?.map(Head::Name)),
            &|p: &mut Self| {
                p.spanned(|p| {
                    p.sym(Token::OpenParen)?;
                    let inner = p.expr()?;
                    p.sym(Token::CloseParen)?;
                    Ok(Head::Paren(Box::new(inner)))
                })
            },
        ])
    }

    /// Try to extend a suffix chain by one suffix.
    pub(super) fn chain_step(&mut self, chain: &mut Vec<Spanned<Suffix>>) -> ChainStep {
        let step = match self.optional(Self::suffix) {
            Some(suffix) if suffix.node.is_call() => {
                chain.push(suffix);
                ChainStep::ContinuesAsCall
            }
            Some(suffix) => {
                chain.push(suffix);
                ChainStep::ContinuesAsIndex
            }
            None => ChainStep::TerminatesChain,
        };
        log::trace!("{}: {step:?}", self.pos());
        step
    }

    /// Parse suffixes for as long as there are any, noting the state after each one.
    pub(super) fn suffix_chain(&mut self) -> (Vec<Spanned<Suffix>>, Vec<Mark>) {
        let mut chain = Vec::new();
        let mut marks = Vec::new();
        while self.chain_step(&mut chain) != ChainStep::TerminatesChain {
            marks.push(self.mark());
        }
        (chain, marks)
    }

    fn suffix(&mut self) -> PResult<Spanned<Suffix>> {
        self.spanned(|p| {
            p.alt(&[
                &|p: &mut Self| Ok(Suffix::Call(p.args()?.node)),
                &|p: &mut Self| {
                    p.sym(Token::Colon)?;
                    let name = p.name()?;
                    let args = p.args()?.node;
                    Ok(Suffix::Method { name, args })
                },
                &|p: &mut Self| {
                    p.sym(Token::OpenBracket)?;
                    let index = p.expr()?;
                    p.sym(Token::CloseBracket)?;
                    Ok(Suffix::Index(Box::new(index)))
                },
                &|p: &mut Self| {
                    p.sym(Token::Dot)?;
                    Ok(Suffix::Field(p.name()?))
                },
            ])
        })
    }

    fn args(&mut self) -> PResult<Spanned<Args>> {
        self.spanned(|p| {
            p.alt(&[
                &|p: &mut Self| {
                    p.sym(Token::OpenParen)?;
                    let exprs = p.optional(Self::expr_list).unwrap_or_default();
                    p.sym(Token::CloseParen)?;
                    Ok(Args::List(exprs))
                },
                &|p: &mut Self| Ok(Args::Table(p.table()?.node)),
                &|p: &mut Self| Ok(Args::Str(p.string()?.node)),
            ])
        })
    }

    /// Parse a table constructor.
    pub fn table(&mut self) -> PResult<Spanned<Vec<Spanned<Field>>>> {
        self.spanned(|p| {
            p.sym(Token::OpenBrace)?;
            let mut fields = Vec::new();
            while let Some(field) = p.optional(Self::field) {
                fields.push(field);
                let sep = p.optional(|p| p.one_of(&[(Token::Comma, ()), (Token::Semicolon, ())]));
                if sep.is_none() {
                    break;
                }
            }
            p.sym(Token::CloseBrace)?;
            Ok(fields)
        })
    }

    fn field(&mut self) -> PResult<Spanned<Field>> {
        self.spanned(|p| {
            p.alt(&[
                &|p: &mut Self| {
                    p.sym(Token::OpenBracket)?;
                    let key = p.expr()?;
                    p.sym(Token::CloseBracket)?;
                    p.sym(Token::Equal)?;
                    let value = p.expr()?;
                    Ok(Field::Keyed { key, value })
                },
                &|p: &mut Self| {
                    let name = p.attempt(|p| {
                        let name = p.name()?;
                        p.sym(Token::Equal)?;
                        Ok(name)
                    })?;
                    let value = p.expr()?;
                    Ok(Field::Named { name, value })
                },
                &|p: &mut Self| Ok(Field::Positional(p.expr()?)),
            ])
        })
    }
}
