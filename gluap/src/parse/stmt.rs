//! Statement, block and chunk grammar.
//!
//! ```text
//! chunk   -> block EOF
//! block   -> ( ';' | stmt )* ( 'return' exprlist? ';'* )?
//!
//! stmt    -> callstmt | assign
//!          | LABEL | 'break' | 'continue' | 'goto' NAME
//!          | 'do' block 'end'
//!          | 'while' expr 'do' block 'end'
//!          | 'repeat' block 'until' expr
//!          | 'if' expr 'then' block ( 'elseif' expr 'then' block )* ( 'else' block )? 'end'
//!          | 'for' NAME '=' expr ',' expr ( ',' expr )? 'do' block 'end'
//!          | 'for' NAME ( ',' NAME )* 'in' exprlist 'do' block 'end'
//!          | 'function' funcname funcbody
//!          | 'local' 'function' NAME funcbody
//!          | 'local' NAME ( ',' NAME )* ( '=' exprlist )?
//!
//! callstmt -> head suffix* call-suffix
//! assign   -> target ( ',' target )* '=' exprlist
//! funcname -> NAME ( '.' NAME )* ( ':' NAME )?
//! ```
//!
//! Calls and assignments share an unbounded prefix (`a.b[c]:d(e).f ...`), so they are told apart
//! only once the suffix chain has been consumed. See [`Parser::call_or_assign`].

use super::error::{Expected, PResult, ParseDiag};
use super::expr::{ChainStep, SuffixPolicy};
use super::Parser;
use crate::span::{Span, Spannable, Spanned};
use crate::syn::{expr, stmt, Block, Expr, FuncName, IfClause, PrefixExp, Return, Stmt};
use crate::tok::Token;

// Grammar
impl Parser {
    /// Parse a whole chunk, up to but not including the end of input.
    ///
    /// Stray block terminators at the top level are skipped.
    pub fn chunk(&mut self) -> PResult<Block> {
        let mut block = self.block()?;
        while block.ret.is_none() && !self.at_end() {
            self.skip_tokens(1, vec![Expected::Named("statement")]);
            block.append(self.block()?);
        }
        Ok(block)
    }

    /// Parse a block, stopping before `end`, `else`, `elseif`, `until` or the end of input.
    ///
    /// Runs of tokens that can neither start a statement nor end the block are skipped with a single
    /// diagnostic each. Each call is one level of nesting; past the limit, the block's contents are
    /// skipped and it is left empty.
    pub fn block(&mut self) -> PResult<Block> {
        if self.too_deep() {
            self.skip_too_deep(false);
            return Ok(Block::default());
        }
        self.deeper(Self::stmts)
    }

    fn stmts(&mut self) -> PResult<Block> {
        let mut block = Block::default();

        loop {
            self.many(|p| p.sym(Token::Semicolon));

            let before = self.cursor;
            if let Some(stmt) = self.optional(Self::stmt) {
                if self.cursor != before {
                    block.stmts.push(stmt);
                    continue;
                }
            }

            if let Some(ret) = self.optional(Self::return_stmt) {
                block.ret = Some(ret);
                break;
            }

            if self.peek().map_or(true, Token::is_block_end) {
                break;
            }
            self.skip_to_stmt();
        }

        Ok(block)
    }

    fn skip_to_stmt(&mut self) {
        let mut count = 0;
        let mut cursor = self.cursor;
        while let Some((tok, next)) = self.stream.next(cursor) {
            let resumes = tok.node.is_stmt_start()
                || tok.node.is_block_end()
                || tok.node == Token::Return;
            if resumes && count > 0 {
                break;
            }
            count += 1;
            cursor = next;
        }
        self.skip_tokens(count, vec![Expected::Named("statement")]);
    }

    fn return_stmt(&mut self) -> PResult<Spanned<Return>> {
        self.spanned(|p| {
            p.sym(Token::Return)?;
            let exprs = p.optional(Self::expr_list).unwrap_or_default();
            p.many(|p| p.sym(Token::Semicolon));
            Ok(Return { exprs })
        })
    }

    /// Parse a single statement.
    pub fn stmt(&mut self) -> PResult<Spanned<Stmt>> {
        self.spanned(|p| {
            p.alt(&[
                &|p: &mut Self| p.call_or_assign(),
                &|p: &mut Self| Ok(Stmt::Label(p.label()?.node)),
                &|p: &mut Self| p.sym(Token::Break).map(|_| Stmt::Break),
                &|p: &mut Self| p.sym(Token::Continue).map(|_| Stmt::Continue),
                &|p: &mut Self| {
                    p.sym(Token::Goto)?;
                    Ok(Stmt::Goto(p.name()?))
                },
                &|p: &mut Self| {
                    p.sym(Token::Do)?;
                    let body = p.block()?;
                    p.sym(Token::End)?;
                    Ok(Stmt::Do(body))
                },
                &|p: &mut Self| p.while_stmt(),
                &|p: &mut Self| p.repeat_stmt(),
                &|p: &mut Self| p.if_stmt(),
                &|p: &mut Self| p.for_stmt(),
                &|p: &mut Self| p.function_stmt(),
                &|p: &mut Self| p.local_stmt(),
            ])
        })
    }

    /// Parse a call statement or an assignment.
    ///
    /// The head and every suffix after it are consumed first. If the chain ends in a call and is not
    /// followed by `,` or `=`, it is a call statement; anything else is an assignment whose first
    /// target is the whole chain.
    pub(super) fn call_or_assign(&mut self) -> PResult<Stmt> {
        let head = self.prefix_head()?;
        let mut chain = Vec::new();
        let mut last = ChainStep::TerminatesChain;
        loop {
            match self.chain_step(&mut chain) {
                ChainStep::TerminatesChain => break,
                step => last = step,
            }
        }

        let first = PrefixExp::new(head, chain);
        let continues = self.check(|t| matches!(t, Token::Comma | Token::Equal));
        if last == ChainStep::ContinuesAsCall && !continues {
            return Ok(Stmt::Call(first));
        }

        self.assignment(first)
    }

    /// The rest of an assignment after its first target.
    ///
    /// Targets are kept as written. Any that end in a call are reported but not repaired.
    fn assignment(&mut self, first: PrefixExp) -> PResult<Stmt> {
        let span = first.span();
        self.check_target(&first, span);
        let mut targets = vec![first.spanned(span)];

        while let Some(target) = self.optional(|p| {
            p.sym(Token::Comma)?;
            p.prefix_exp(SuffixPolicy::Unrestricted)
        }) {
            let span = target.span();
            self.check_target(&target, span);
            targets.push(target.spanned(span));
        }

        let eq = self.sym(Token::Equal)?;
        let mut exprs = self.expr_list()?;
        expr::pad_with_nil(&mut exprs, targets.len(), eq);

        Ok(stmt::assign(targets, exprs))
    }

    fn check_target(&mut self, target: &PrefixExp, span: Span) {
        if target.ends_in_call() {
            log::debug!("{}: call used as assignment target", span.start);
            self.diags.push(ParseDiag::not_assignable(span));
        } else if target.is_bare_paren() {
            log::debug!("{}: parenthesized assignment target", span.start);
            self.diags.push(ParseDiag::parenthesized_target(span));
        }
    }

    fn while_stmt(&mut self) -> PResult<Stmt> {
        self.sym(Token::While)?;
        let cond = self.expr()?;
        self.sym(Token::Do)?;
        let body = self.block()?;
        self.sym(Token::End)?;
        Ok(Stmt::While { cond, body })
    }

    fn repeat_stmt(&mut self) -> PResult<Stmt> {
        self.sym(Token::Repeat)?;
        let body = self.block()?;
        self.sym(Token::Until)?;
        let cond = self.expr()?;
        Ok(Stmt::Repeat { body, cond })
    }

    fn if_stmt(&mut self) -> PResult<Stmt> {
        self.sym(Token::If)?;
        let mut clauses = vec![self.if_clause()?];
        clauses.extend(self.many(|p| {
            p.sym(Token::Elseif)?;
            p.if_clause()
        }));
        let else_body = self.optional(|p| {
            p.sym(Token::Else)?;
            p.block()
        });
        self.sym(Token::End)?;
        Ok(Stmt::If { clauses, else_body })
    }

    fn if_clause(&mut self) -> PResult<IfClause> {
        let cond = self.expr()?;
        self.sym(Token::Then)?;
        let body = self.block()?;
        Ok(IfClause { cond, body })
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        let kw = self.sym(Token::For)?;
        let var = self.name()?;
        self.alt(&[
            &|p: &mut Self| p.numeric_for(kw, var.clone()),
            &|p: &mut Self| p.generic_for(var.clone()),
        ])
    }

    /// The rest of a numeric `for`, after its variable.
    ///
    /// A missing step is filled in as `1`, positioned at the `for` keyword.
    fn numeric_for(&mut self, kw: Span, var: Spanned<String>) -> PResult<Stmt> {
        self.sym(Token::Equal)?;
        let start = self.expr()?;
        self.sym(Token::Comma)?;
        let stop = self.expr()?;
        let step = self
            .optional(|p| {
                p.sym(Token::Comma)?;
                p.expr()
            })
            .unwrap_or_else(|| Expr::Number("1".into()).spanned(kw));
        self.sym(Token::Do)?;
        let body = self.block()?;
        self.sym(Token::End)?;
        Ok(Stmt::NumericFor {
            var,
            start,
            stop,
            step,
            body,
        })
    }

    /// The rest of a generic `for`, after its first variable.
    fn generic_for(&mut self, first: Spanned<String>) -> PResult<Stmt> {
        let mut vars = vec![first];
        vars.extend(self.many(|p| {
            p.sym(Token::Comma)?;
            p.name()
        }));
        self.sym(Token::In)?;
        let exprs = self.expr_list()?;
        self.sym(Token::Do)?;
        let body = self.block()?;
        self.sym(Token::End)?;
        Ok(Stmt::GenericFor { vars, exprs, body })
    }

    fn function_stmt(&mut self) -> PResult<Stmt> {
        self.sym(Token::Function)?;
        let name = self.func_name()?;
        let body = self.func_body()?;
        Ok(Stmt::Function { name, body })
    }

    fn func_name(&mut self) -> PResult<FuncName> {
        let mut path = vec![self.name()?];
        path.extend(self.many(|p| {
            p.sym(Token::Dot)?;
            p.name()
        }));
        let method = self.optional(|p| {
            p.sym(Token::Colon)?;
            p.name()
        });
        Ok(FuncName { path, method })
    }

    fn local_stmt(&mut self) -> PResult<Stmt> {
        self.sym(Token::Local)?;
        self.alt(&[
            &|p: &mut Self| {
                p.sym(Token::Function)?;
                let name = p.name()?;
                let body = p.func_body()?;
                Ok(Stmt::LocalFunction { name, body })
            },
            &|p: &mut Self| p.local_decl(),
        ])
    }

    /// `local` names with optional values, padded with `nil`.
    ///
    /// Padding sits at the `=` if there is one, and at the last name otherwise.
    fn local_decl(&mut self) -> PResult<Stmt> {
        let names = self.sep_by1(Self::name, |p| p.sym(Token::Comma))?;

        let (mut exprs, pad_at) = match self.optional(|p| p.sym(Token::Equal)) {
            Some(eq) => (self.expr_list()?, eq),
            None => {
                let last = names.last().map_or_else(|| Span::point(self.pos()), |n| n.span);
                (Vec::new(), last)
            }
        };
        expr::pad_with_nil(&mut exprs, names.len(), pad_at);

        Ok(stmt::local(names, exprs))
    }
}
