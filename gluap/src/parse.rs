//! Error-tolerant parser.
//!
//! Parsing is total: every entry point returns a tree, together with the diagnostics describing
//! whatever had to be repaired or skipped to build it.

use crate::config::{ParseConfig, DEFAULT_MAX_DEPTH};
use crate::span::{Pos, Span, Spannable, Spanned};
use crate::syn::{Block, Chunk, Expr, Stmt};
use crate::tok::{end_of_source, tokenize, Token};

use self::combinator::Speculation;
use self::stream::{Cursor, TokenStream};

mod combinator;
pub mod error;
mod expr;
mod stmt;
pub mod stream;


pub use self::error::{Cause, Expected, PResult, ParseDiag, Repair, Stuck};
pub use self::expr::SuffixPolicy;
pub use self::stream::split_comments;

/// Parser state for one parse.
///
/// Grammar rules are methods on this type; any of the public ones can be run on its own with
/// [`parse_rule`].
#[derive(Debug)]
pub struct Parser {
    stream: TokenStream,
    cursor: Cursor,
    mode: Speculation,
    diags: Vec<ParseDiag>,

    /// How many expressions and blocks enclose the cursor, and how many may.
    depth: usize,
    max_depth: usize,

    /// Everything the alternatives of an exhausted choice expected, to be reported by the matcher
    /// that does the repair.
    hint: Option<Vec<Expected>>,
}

impl Parser {
    fn new(stream: TokenStream, max_depth: usize) -> Self {
        Self {
            cursor: stream.start(),
            stream,
            mode: Speculation::Committed,
            diags: Vec::new(),
            depth: 0,
            max_depth,
            hint: None,
        }
    }
}

/// Run a single grammar rule over `tokens`, then require the end of input.
///
/// Comment tokens are dropped, and nesting is limited to [`DEFAULT_MAX_DEPTH`]. If the rule
/// cannot produce anything at all, `fallback` provides the value and the failure is reported as an
/// unrepaired diagnostic.
pub fn parse_rule<T>(
    tokens: Vec<Spanned<Token>>,
    rule: impl FnOnce(&mut Parser) -> PResult<T>,
    fallback: impl FnOnce() -> T,
) -> (T, Vec<ParseDiag>) {
    let (_, tokens) = split_comments(tokens);
    run_rule(TokenStream::from_tokens(tokens), DEFAULT_MAX_DEPTH, rule, fallback)
}

fn run_rule<T>(
    stream: TokenStream,
    max_depth: usize,
    rule: impl FnOnce(&mut Parser) -> PResult<T>,
    fallback: impl FnOnce() -> T,
) -> (T, Vec<ParseDiag>) {
    let mut parser = Parser::new(stream, max_depth);

    let value = match rule(&mut parser) {
        Ok(value) => value,
        Err(stuck) => {
            let span = Span::point(parser.pos());
            let found = parser.peek().cloned();
            log::debug!("{}: rule failed outright", span.start);
            parser
                .diags
                .push(ParseDiag::unexpected(span, found, stuck.expected, Repair::Unrepaired));
            fallback()
        }
    };

    // Committed, so this always succeeds.
    let _ = parser.end_of_input();

    (value, parser.diags)
}

/// Parse a chunk from a token list.
///
/// Comment tokens are split off into [`Chunk::comments`]; everything else is parsed.
pub fn parse(tokens: Vec<Spanned<Token>>) -> (Chunk, Vec<ParseDiag>) {
    let end = tokens.last().map_or_else(Pos::default, |tok| tok.span.end);
    parse_tokens(tokens, end, &ParseConfig::default())
}

/// Lex and parse a chunk with the default configuration.
pub fn parse_from_text(source: &str) -> (Chunk, Vec<ParseDiag>) {
    parse_with_config(source, &ParseConfig::default())
}

/// Lex and parse a chunk.
///
/// Lexical errors are reported alongside parse diagnostics, in source order.
pub fn parse_with_config(source: &str, config: &ParseConfig) -> (Chunk, Vec<ParseDiag>) {
    let (tokens, lex_errors) = tokenize(source, config.dialect);
    let (chunk, parse_diags) = parse_tokens(tokens, end_of_source(source), config);

    let mut diags: Vec<_> = lex_errors.into_iter().map(ParseDiag::lexical).collect();
    diags.extend(parse_diags);
    diags.sort_by_key(|diag| diag.span.start);

    (chunk, diags)
}

fn parse_tokens(
    tokens: Vec<Spanned<Token>>,
    end: Pos,
    config: &ParseConfig,
) -> (Chunk, Vec<ParseDiag>) {
    let (comments, tokens) = split_comments(tokens);

    if let Some(limit) = config.token_limit {
        if let Some(first_over) = tokens.get(limit) {
            log::debug!("token limit of {limit} exceeded ({} tokens)", tokens.len());
            let diag = ParseDiag::token_limit(first_over.span, limit, tokens.len());
            let chunk = Chunk {
                comments,
                block: Block::default(),
            };
            return (chunk, vec![diag]);
        }
    }

    let (block, diags) = run_rule(
        TokenStream::new(tokens, end),
        config.max_depth,
        Parser::chunk,
        Block::default,
    );
    (Chunk { comments, block }, diags)
}

/// Parse a single expression.
pub fn parse_expr(tokens: Vec<Spanned<Token>>) -> (Spanned<Expr>, Vec<ParseDiag>) {
    parse_rule(tokens, Parser::expr, || Expr::Nil.spanned(Span::default()))
}

/// Parse a single statement.
pub fn parse_stmt(tokens: Vec<Spanned<Token>>) -> (Spanned<Stmt>, Vec<ParseDiag>) {
    parse_rule(tokens, Parser::stmt, || {
        Stmt::Do(Block::default()).spanned(Span::default())
    })
}

/// Parse a block.
pub fn parse_block(tokens: Vec<Spanned<Token>>) -> (Block, Vec<ParseDiag>) {
    parse_rule(tokens, Parser::block, Block::default)
}
