use std::fmt::Debug;
use std::ops::Range;

use indoc::indoc;

use super::*;
use crate::diag::render;

trait TokenTestable {
    fn check(&self, tok: &Spanned<Token>) -> bool;
}

impl TokenTestable for Token {
    fn check(&self, tok: &Spanned<Token>) -> bool {
        self == &tok.node
    }
}

impl TokenTestable for Range<usize> {
    fn check(&self, tok: &Spanned<Token>) -> bool {
        &tok.span.range() == self
    }
}

/// `(line, column)` of the start and end of the token.
impl TokenTestable for Range<(usize, usize)> {
    fn check(&self, tok: &Spanned<Token>) -> bool {
        let Span { start, end } = tok.span;
        ((start.line, start.column), (end.line, end.column)) == (self.start, self.end)
    }
}

impl<A, B> TokenTestable for (A, B)
where
    A: TokenTestable,
    B: TokenTestable,
{
    fn check(&self, tok: &Spanned<Token>) -> bool {
        self.0.check(tok) && self.1.check(tok)
    }
}

/// Lex `source`, checking the tokens against `expected` and returning any lexical errors.
fn check_scan_dialect<I, T>(source: &str, dialect: Dialect, expected: I) -> Vec<LexError>
where
    I: IntoIterator<Item = T>,
    T: TokenTestable + Debug,
{
    let mut lexer = Lexer::new(source, dialect);
    let mut expected = expected.into_iter();
    let mut success = true;

    loop {
        match (lexer.next(), expected.next()) {
            (None, None) => break,
            (None, Some(expected)) => {
                eprintln!("Reached end of scan earlier than expected (next expected {expected:?})");
                success = false;
                break;
            }
            (Some(tok), None) => {
                eprintln!("Scanned more tokens than expected (next scanned {tok:?})");
                success = false;
                break;
            }
            (Some(tok), Some(expected)) => {
                if !expected.check(&tok) {
                    eprintln!("Spanned<Token> mismatch: expected {expected:?}, got {tok:?}");
                    success = false;
                }
            }
        }
    }

    assert!(success);
    lexer.into_errors()
}

fn check_scan<I, T>(source: &str, expected: I) -> Vec<LexError>
where
    I: IntoIterator<Item = T>,
    T: TokenTestable + Debug,
{
    check_scan_dialect(source, Dialect::GLua, expected)
}

use Token::*;

fn ident(s: &str) -> Token {
    Ident(s.into())
}

fn strlit(s: &str) -> Token {
    Str(s.into())
}

fn num(n: &str) -> Token {
    Number(n.into())
}

fn comment(kind: CommentKind, text: &str) -> Token {
    Token::Comment(super::Comment {
        kind,
        text: text.into(),
    })
}

#[test]
fn keywords() {
    let source = "and break do else elseif end false for function goto if in local nil not or \
                  repeat return then true until while continue";
    let expected = [
        (And, 0..3),
        (Break, 4..9),
        (Do, 10..12),
        (Else, 13..17),
        (Elseif, 18..24),
        (End, 25..28),
        (False, 29..34),
        (For, 35..38),
        (Function, 39..47),
        (Goto, 48..52),
        (If, 53..55),
        (In, 56..58),
        (Local, 59..64),
        (Nil, 65..68),
        (Not, 69..72),
        (Or, 73..75),
        (Repeat, 76..82),
        (Return, 83..89),
        (Then, 90..94),
        (True, 95..99),
        (Until, 100..105),
        (While, 106..111),
        (Continue, 112..120),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn punctuation() {
    let source = "+ - * / % ^ # == ~= <= >= < > = ( ) { } [ ] ; : , . .. ...";
    let expected = [
        Plus,
        Minus,
        Star,
        Slash,
        Percent,
        Caret,
        Hash,
        EqualEqual,
        TildeEqual,
        LessEqual,
        GreaterEqual,
        Less,
        Greater,
        Equal,
        OpenParen,
        CloseParen,
        OpenBrace,
        CloseBrace,
        OpenBracket,
        CloseBracket,
        Semicolon,
        Colon,
        Comma,
        Dot,
        DotDot,
        Ellipsis,
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn dialect_punctuation() {
    let source = "a && b || !c != d";
    let expected = [
        ident("a"),
        AmpAmp,
        ident("b"),
        PipePipe,
        Bang,
        ident("c"),
        BangEqual,
        ident("d"),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn plain_lua_has_no_extensions() {
    let expected = [ident("continue"), ident("a"), Slash, Slash, ident("b")];
    assert!(check_scan_dialect("continue a // b", Dialect::Lua52, expected).is_empty());

    let errors = check_scan_dialect("a && b", Dialect::Lua52, [ident("a"), ident("b")]);
    assert_eq!(
        errors.iter().map(|e| &e.kind).collect::<Vec<_>>(),
        [
            &LexErrorKind::UnrecognizedChar('&'),
            &LexErrorKind::UnrecognizedChar('&')
        ]
    );
}

#[test]
fn idents() {
    let source = "hey what num_3 _unused __ n1234 fortune ending iff";
    let expected = [
        ident("hey"),
        ident("what"),
        ident("num_3"),
        ident("_unused"),
        ident("__"),
        ident("n1234"),
        ident("fortune"),
        ident("ending"),
        ident("iff"),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn comments() {
    let source = indoc! {"
        -- line
        x --[[ block
        ]] y --[==[ a ]] b ]==] z
        // slash
        /* slash
           block */ w"};
    let expected = [
        comment(CommentKind::Line, "-- line"),
        ident("x"),
        comment(CommentKind::Block, "--[[ block\n]]"),
        ident("y"),
        comment(CommentKind::Block, "--[==[ a ]] b ]==]"),
        ident("z"),
        comment(CommentKind::SlashLine, "// slash"),
        comment(CommentKind::SlashBlock, "/* slash\n   block */"),
        ident("w"),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn dash_dash_bracket_without_long_bracket_is_a_line_comment() {
    let expected = [comment(CommentKind::Line, "--[ not long"), ident("x")];
    assert!(check_scan("--[ not long\nx", expected).is_empty());
}

#[test]
fn strings() {
    let source = r#"'c' "a\"b" "it's" [[long]] [=[x]]y]=] [==[
two lines]==]"#;
    let expected = [
        strlit("'c'"),
        strlit(r#""a\"b""#),
        strlit(r#""it's""#),
        strlit("[[long]]"),
        strlit("[=[x]]y]=]"),
        strlit("[==[\ntwo lines]==]"),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn brackets_are_not_long_strings() {
    let expected = [ident("a"), OpenBracket, ident("b"), CloseBracket, OpenBracket, Equal];
    assert!(check_scan("a[b] [=", expected).is_empty());
}

#[test]
fn numbers() {
    let source = "3 3.0 3.1416 314.16e-2 0.31416E1 0xff 0x0.1E 0xA23p-4 0X1P+2 .5";
    let expected = [
        num("3"),
        num("3.0"),
        num("3.1416"),
        num("314.16e-2"),
        num("0.31416E1"),
        num("0xff"),
        num("0x0.1E"),
        num("0xA23p-4"),
        num("0X1P+2"),
        num(".5"),
    ];
    assert!(check_scan(source, expected).is_empty());
}

#[test]
fn malformed_numbers() {
    let errors = check_scan("3x 1e", [(num("3x"), 0..2), (num("1e"), 3..5)]);
    assert_eq!(
        errors,
        [
            LexError {
                kind: LexErrorKind::MalformedNumber,
                span: Span::new(Pos::new(0, 0, 0), Pos::new(0, 2, 2)),
            },
            LexError {
                kind: LexErrorKind::MalformedNumber,
                span: Span::new(Pos::new(0, 3, 3), Pos::new(0, 5, 5)),
            },
        ]
    );
}

#[test]
fn labels() {
    let source = "::top:: :: spaced :: goto top";
    let expected = [
        (Label("top".into()), 0..7),
        (Label("spaced".into()), 8..20),
        (Goto, 21..25),
        (ident("top"), 26..29),
    ];
    assert!(check_scan(source, expected).is_empty());

    let errors = check_scan(":: 3", [Label(String::new()), num("3")]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::MalformedLabel);
}

#[test]
fn positions() {
    let source = "x\n  y = 'é' z";
    let expected = [
        (ident("x"), (0, 0)..(0, 1)),
        (ident("y"), (1, 2)..(1, 3)),
        (Equal, (1, 4)..(1, 5)),
        (strlit("'é'"), (1, 6)..(1, 9)),
        (ident("z"), (1, 10)..(1, 11)),
    ];
    assert!(check_scan(source, expected).is_empty());

    // Columns count characters, offsets count bytes.
    assert!(check_scan("'é' z", [(strlit("'é'"), 0..4), (ident("z"), 5..6)]).is_empty());
}

#[test]
fn end_of_source_position() {
    assert_eq!(end_of_source(""), Pos::new(0, 0, 0));
    assert_eq!(end_of_source("a\nbc"), Pos::new(1, 2, 4));
    assert_eq!(end_of_source("a\n"), Pos::new(1, 0, 2));
}

#[test]
fn lexical_errors_do_not_stop_the_scan() {
    let source = indoc! {r#"
        x = "abc
        @ y --[[ never closed"#};
    let expected = [
        ident("x"),
        Equal,
        strlit("\"abc"),
        ident("y"),
        comment(CommentKind::Block, "--[[ never closed"),
    ];
    let errors = check_scan(source, expected);
    let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        [
            LexErrorKind::UnterminatedString,
            LexErrorKind::UnrecognizedChar('@'),
            LexErrorKind::UnterminatedComment,
        ]
    );
}

#[test]
fn tokenize_collects_everything() {
    let (tokens, errors) = tokenize("local s = [[x", Dialect::GLua);
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[3].node, strlit("[[x"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "unterminated long string at 1:11");
}

#[test]
fn token_text() {
    assert_eq!(Label("a".into()).to_string(), "::a::");
    assert_eq!(TildeEqual.to_string(), "~=");
    assert_eq!(ident("x").describe(), "identifier `x`");
    assert_eq!(End.describe(), "`end`");
    assert!(End.insertion_cost() < Local.insertion_cost());
    assert!(Local.insertion_cost() < ident("x").insertion_cost());
}

#[test]
fn render_lex_errors() {
    let source = "x = 'abc\n";
    let (_, errors) = tokenize(source, Dialect::GLua);
    let rendered = render("test.lua", source, errors).unwrap();
    assert!(rendered.contains("error: unterminated string literal"), "{rendered}");
    assert!(rendered.contains("test.lua:1:5"), "{rendered}");
}
