//! Lexical definitions and lexer implementation.

use std::fmt::{self, Display, Formatter};

use crate::config::Dialect;
use crate::diag::{Diag, DiagKind, Diagnostic};
use crate::span::{Pos, Span, Spannable, Spanned};

#[cfg(test)]
mod test;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    // Keywords
    And,
    Break,
    Continue,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,

    // Punctuation
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

    // Dialect punctuation
    AmpAmp,
    PipePipe,
    BangEqual,
    Bang,

    /// An identifier.
    Ident(String),

    /// A string literal, as written in the source (delimiters and escapes included).
    Str(String),

    /// A number literal, as written in the source.
    Number(String),

    /// A `::name::` label.
    Label(String),

    Comment(Comment),
}

/// A comment, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `-- ...`
    Line,

    /// `--[[ ... ]]`, at any bracket level
    Block,

    /// `// ...`
    SlashLine,

    /// `/* ... */`
    SlashBlock,
}

impl Token {
    /// Can this token begin a statement?
    ///
    /// `return` is not included; it is only valid as the last element of a block.
    pub fn is_stmt_start(&self) -> bool {
        matches!(
            self,
            Token::Ident(_)
                | Token::OpenParen
                | Token::Label(_)
                | Token::Break
                | Token::Continue
                | Token::Goto
                | Token::Do
                | Token::While
                | Token::Repeat
                | Token::If
                | Token::For
                | Token::Function
                | Token::Local
                | Token::Semicolon
        )
    }

    /// Does this token close a block?
    pub fn is_block_end(&self) -> bool {
        matches!(
            self,
            Token::End | Token::Else | Token::Elseif | Token::Until
        )
    }

    /// Whether this token opens a construct that a [`closes_nesting`](Self::closes_nesting)
    /// token ends.
    pub fn opens_nesting(&self) -> bool {
        matches!(
            self,
            Token::OpenParen
                | Token::OpenBracket
                | Token::OpenBrace
                | Token::Function
                | Token::Do
                | Token::If
                | Token::Repeat
        )
    }

    pub fn closes_nesting(&self) -> bool {
        matches!(
            self,
            Token::CloseParen | Token::CloseBracket | Token::CloseBrace | Token::End | Token::Until
        )
    }

    /// The cost of synthesizing this token during error recovery.
    ///
    /// Closing delimiters and separators are the cheapest to insert, since they are the tokens
    /// most commonly left out.
    pub fn insertion_cost(&self) -> u32 {
        match self {
            Token::CloseParen
            | Token::CloseBracket
            | Token::CloseBrace
            | Token::End
            | Token::Then
            | Token::Do
            | Token::Until
            | Token::In
            | Token::Equal
            | Token::Comma => 2,

            Token::Ident(_) | Token::Str(_) | Token::Number(_) | Token::Label(_) => 5,

            _ => 4,
        }
    }

    /// A short description for use in diagnostics, e.g. ``identifier `foo` ``.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier `{name}`"),
            Token::Str(_) => "string literal".into(),
            Token::Number(n) => format!("number `{n}`"),
            Token::Label(name) => format!("label `::{name}::`"),
            Token::Comment(_) => "comment".into(),
            tok => format!("`{tok}`"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::And => "and",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Do => "do",
            Token::Else => "else",
            Token::Elseif => "elseif",
            Token::End => "end",
            Token::False => "false",
            Token::For => "for",
            Token::Function => "function",
            Token::Goto => "goto",
            Token::If => "if",
            Token::In => "in",
            Token::Local => "local",
            Token::Nil => "nil",
            Token::Not => "not",
            Token::Or => "or",
            Token::Repeat => "repeat",
            Token::Return => "return",
            Token::Then => "then",
            Token::True => "true",
            Token::Until => "until",
            Token::While => "while",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Caret => "^",
            Token::Hash => "#",
            Token::EqualEqual => "==",
            Token::TildeEqual => "~=",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::Equal => "=",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::DotDot => "..",
            Token::Ellipsis => "...",
            Token::AmpAmp => "&&",
            Token::PipePipe => "||",
            Token::BangEqual => "!=",
            Token::Bang => "!",
            Token::Ident(s) | Token::Str(s) | Token::Number(s) => s,
            Token::Label(name) => return write!(f, "::{name}::"),
            Token::Comment(comment) => &comment.text,
        };
        f.write_str(s)
    }
}

/// A lexical error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}", .span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated long string")]
    UnterminatedLongString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed number")]
    MalformedNumber,

    #[error("malformed label")]
    MalformedLabel,

    #[error("unrecognized character {0:?}")]
    UnrecognizedChar(char),
}

impl LexErrorKind {
    fn label(&self) -> &'static str {
        match self {
            LexErrorKind::UnterminatedString => "this string is missing its closing quote",
            LexErrorKind::UnterminatedLongString => "this string is missing its closing bracket",
            LexErrorKind::UnterminatedComment => "this comment is never closed",
            LexErrorKind::MalformedNumber => "this is not a valid number",
            LexErrorKind::MalformedLabel => "labels are written `::name::`",
            LexErrorKind::UnrecognizedChar(_) => "this character is not part of any token",
        }
    }
}

impl Diagnostic for LexError {
    fn into_diag(self) -> Diag {
        Diag::new(DiagKind::Error, self.kind.to_string()).with_primary(self.span, self.kind.label())
    }
}

/// Lex an entire source text.
///
/// Lexing never stops early: malformed input is reported and skipped, so the token list is always
/// as complete as the source allows.
pub fn tokenize(source: &str, dialect: Dialect) -> (Vec<Spanned<Token>>, Vec<LexError>) {
    let mut lexer = Lexer::new(source, dialect);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.into_errors())
}

#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    dialect: Dialect,
    cursor: Pos,
    span_start: Pos,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            cursor: Pos::default(),
            span_start: Pos::default(),
            errors: Vec::new(),
        }
    }

    /// Errors encountered so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// The position just past the end of the source.
    pub fn end_of_source(&self) -> Pos {
        end_of_source(self.source)
    }
}

/// The position just past the end of `source`.
pub fn end_of_source(source: &str) -> Pos {
    let line = source.matches('\n').count();
    let last_line = source.rsplit('\n').next().unwrap_or_default();
    Pos::new(line, last_line.chars().count(), source.len())
}

impl Iterator for Lexer<'_> {
    type Item = Spanned<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

impl<'src> Lexer<'src> {
    /// The unscanned remainder of the source.
    fn rest(&self) -> &'src str {
        &self.source[self.cursor.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance over one character, keeping line and column up to date.
    fn skip(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor.offset += c.len_utf8();
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 0;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.skip();
            true
        } else {
            false
        }
    }

    fn skip_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut pred) {
            self.skip();
        }
    }

    fn skip_until(&mut self, mut pred: impl FnMut(char) -> bool) {
        self.skip_while(move |c| !pred(c));
    }

    /// The current span, from the span start to the cursor.
    fn span(&self) -> Span {
        Span::new(self.span_start, self.cursor)
    }

    /// The source text of the current span.
    fn text(&self) -> &'src str {
        &self.source[self.span_start.offset..self.cursor.offset]
    }

    fn token(&self, tok: Token) -> Option<Spanned<Token>> {
        Some(tok.spanned(self.span()))
    }

    fn token_with_text(&self, f: impl FnOnce(String) -> Token) -> Option<Spanned<Token>> {
        self.token(f(self.text().into()))
    }

    fn error(&mut self, kind: LexErrorKind) {
        let span = self.span();
        log::debug!("lex error at {}: {kind}", span.start);
        self.errors.push(LexError { kind, span });
    }

    /// The level of the long bracket opening at the cursor, if there is one.
    ///
    /// Assumes the cursor is on the first `[`. `[[` is level 0, `[=[` level 1, and so on.
    fn long_bracket_level(&self) -> Option<usize> {
        let rest = self.rest().strip_prefix('[')?;
        let level = rest.chars().take_while(|&c| c == '=').count();
        rest[level..].starts_with('[').then_some(level)
    }

    /// Skip a long bracket body of the given level, including the opener and closer.
    ///
    /// Returns whether the closer was found before the end of input.
    fn skip_long_bracket(&mut self, level: usize) -> bool {
        for _ in 0..level + 2 {
            self.skip();
        }

        let closer = format!("]{}]", "=".repeat(level));
        match self.rest().find(&closer) {
            Some(idx) => {
                let target = self.cursor.offset + idx + closer.len();
                while self.cursor.offset < target {
                    self.skip();
                }
                true
            }
            None => {
                self.skip_while(|_| true);
                false
            }
        }
    }

    /// Scan a comment. Assumes the opening `--` has been advanced over.
    fn scan_dash_comment(&mut self) -> Option<Spanned<Token>> {
        let kind = if let Some(level) = self.long_bracket_level() {
            if !self.skip_long_bracket(level) {
                self.error(LexErrorKind::UnterminatedComment);
            }
            CommentKind::Block
        } else {
            self.skip_until(|c| c == '\n');
            CommentKind::Line
        };
        self.comment(kind)
    }

    /// Scan a `/* */` comment. Assumes the opening `/*` has been advanced over.
    fn scan_slash_block_comment(&mut self) -> Option<Spanned<Token>> {
        match self.rest().find("*/") {
            Some(idx) => {
                let target = self.cursor.offset + idx + 2;
                while self.cursor.offset < target {
                    self.skip();
                }
            }
            None => {
                self.skip_while(|_| true);
                self.error(LexErrorKind::UnterminatedComment);
            }
        }
        self.comment(CommentKind::SlashBlock)
    }

    fn comment(&self, kind: CommentKind) -> Option<Spanned<Token>> {
        self.token_with_text(|text| Token::Comment(Comment { kind, text }))
    }

    /// Scan a quoted string. Assumes the opening quote has been advanced over.
    ///
    /// Escapes are skipped over but not interpreted.
    fn scan_string(&mut self, quote: char) -> Option<Spanned<Token>> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString);
                    break;
                }
                Some('\\') => {
                    self.skip();
                    self.skip();
                }
                Some(c) => {
                    self.skip();
                    if c == quote {
                        break;
                    }
                }
            }
        }
        self.token_with_text(Token::Str)
    }

    /// Scan a long string. Assumes the cursor is at its opening `[`.
    fn scan_long_string(&mut self, level: usize) -> Option<Spanned<Token>> {
        if !self.skip_long_bracket(level) {
            self.error(LexErrorKind::UnterminatedLongString);
        }
        self.token_with_text(Token::Str)
    }

    /// Scan a number. Assumes its first character (a digit or `.`) has been advanced over.
    fn scan_number(&mut self, first: char) -> Option<Spanned<Token>> {
        let hex = first == '0' && matches!(self.peek(), Some('x' | 'X'));
        let (digit, exponent): (fn(char) -> bool, [char; 2]) = if hex {
            self.skip();
            (|c| c.is_ascii_hexdigit(), ['p', 'P'])
        } else {
            (|c| c.is_ascii_digit(), ['e', 'E'])
        };

        self.skip_while(digit);
        if first != '.' && self.peek() == Some('.') {
            self.skip();
            self.skip_while(digit);
        }

        if self.peek().is_some_and(|c| exponent.contains(&c)) {
            self.skip();
            if matches!(self.peek(), Some('+' | '-')) {
                self.skip();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.error(LexErrorKind::MalformedNumber);
            }
            self.skip_while(|c| c.is_ascii_digit());
        }

        if self.peek().is_some_and(|c| is_ident_continue(c) || c == '.') {
            self.skip_while(|c| is_ident_continue(c) || c == '.');
            self.error(LexErrorKind::MalformedNumber);
        }

        self.token_with_text(Token::Number)
    }

    /// Scan a `::name::` label. Assumes the opening `::` has been advanced over.
    fn scan_label(&mut self) -> Option<Spanned<Token>> {
        self.skip_while(char::is_whitespace);
        let name_start = self.cursor.offset;
        if self.peek().is_some_and(is_ident_start) {
            self.skip_while(is_ident_continue);
        }
        let name = self.source[name_start..self.cursor.offset].to_string();
        self.skip_while(char::is_whitespace);

        if name.is_empty() || !self.rest().starts_with("::") {
            self.error(LexErrorKind::MalformedLabel);
        } else {
            self.skip();
            self.skip();
        }
        self.token(Token::Label(name))
    }

    /// Scan an identifier or keyword. Assumes the first character has been advanced over.
    fn scan_ident(&mut self) -> Option<Spanned<Token>> {
        use Token::*;

        self.skip_while(is_ident_continue);
        match self.text() {
            "and" => self.token(And),
            "break" => self.token(Break),
            "continue" if self.dialect.has_extensions() => self.token(Continue),
            "do" => self.token(Do),
            "else" => self.token(Else),
            "elseif" => self.token(Elseif),
            "end" => self.token(End),
            "false" => self.token(False),
            "for" => self.token(For),
            "function" => self.token(Function),
            "goto" => self.token(Goto),
            "if" => self.token(If),
            "in" => self.token(In),
            "local" => self.token(Local),
            "nil" => self.token(Nil),
            "not" => self.token(Not),
            "or" => self.token(Or),
            "repeat" => self.token(Repeat),
            "return" => self.token(Return),
            "then" => self.token(Then),
            "true" => self.token(True),
            "until" => self.token(Until),
            "while" => self.token(While),
            _ => self.token_with_text(Ident),
        }
    }

    /// Scan from the cursor, yielding a single token.
    ///
    /// Returns `None` at the end of the input. Unrecognized characters are reported and skipped.
    fn scan(&mut self) -> Option<Spanned<Token>> {
        use Token::*;

        let ext = self.dialect.has_extensions();

        loop {
            self.skip_while(char::is_whitespace);
            self.span_start = self.cursor;

            let c = self.skip()?;
            break match c {
                '-' if self.match_next('-') => self.scan_dash_comment(),
                '-' => self.token(Minus),
                '/' if ext && self.match_next('/') => {
                    self.skip_until(|c| c == '\n');
                    self.comment(CommentKind::SlashLine)
                }
                '/' if ext && self.match_next('*') => self.scan_slash_block_comment(),
                '/' => self.token(Slash),
                '+' => self.token(Plus),
                '*' => self.token(Star),
                '%' => self.token(Percent),
                '^' => self.token(Caret),
                '#' => self.token(Hash),
                '(' => self.token(OpenParen),
                ')' => self.token(CloseParen),
                '{' => self.token(OpenBrace),
                '}' => self.token(CloseBrace),
                ']' => self.token(CloseBracket),
                ';' => self.token(Semicolon),
                ',' => self.token(Comma),

                '=' if self.match_next('=') => self.token(EqualEqual),
                '=' => self.token(Equal),
                '<' if self.match_next('=') => self.token(LessEqual),
                '<' => self.token(Less),
                '>' if self.match_next('=') => self.token(GreaterEqual),
                '>' => self.token(Greater),
                '~' if self.match_next('=') => self.token(TildeEqual),

                '&' if ext && self.match_next('&') => self.token(AmpAmp),
                '|' if ext && self.match_next('|') => self.token(PipePipe),
                '!' if ext && self.match_next('=') => self.token(BangEqual),
                '!' if ext => self.token(Bang),

                ':' if self.match_next(':') => self.scan_label(),
                ':' => self.token(Colon),

                '.' if self.peek() == Some('.') => {
                    self.skip();
                    if self.match_next('.') {
                        self.token(Ellipsis)
                    } else {
                        self.token(DotDot)
                    }
                }
                '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number('.'),
                '.' => self.token(Dot),

                '"' | '\'' => self.scan_string(c),

                '[' => {
                    // The `[` has already been advanced over; step back onto it to measure the
                    // bracket level.
                    self.cursor = self.span_start;
                    match self.long_bracket_level() {
                        Some(level) => self.scan_long_string(level),
                        None => {
                            self.skip();
                            self.token(OpenBracket)
                        }
                    }
                }

                c if c.is_ascii_digit() => self.scan_number(c),
                c if is_ident_start(c) => self.scan_ident(),

                c => {
                    self.error(LexErrorKind::UnrecognizedChar(c));
                    continue;
                }
            };
        }
    }
}

