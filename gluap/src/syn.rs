//! Abstract syntax tree.
//!
//! Every node is created once by the parser and owned by exactly one parent. Positions are carried
//! by [`Spanned`] wrappers rather than by the nodes themselves.
//!
//! The `Display` implementations print source text that parses back to a structurally equal tree
//! (see [`SynEq`]). They make no attempt at pleasant layout.

use std::fmt::{self, Display, Formatter};

use crate::span::{Span, Spannable, Spanned};
use crate::tok::Comment;

pub type Name = String;

/// The syntax tree of one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Every comment in the source, in source order.
    pub comments: Vec<Spanned<Comment>>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,

    /// The trailing `return`, if any. Never followed by further statements.
    pub ret: Option<Spanned<Return>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub exprs: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `::name::`
    Label(Name),

    Break,

    Continue,

    Goto(Spanned<Name>),

    Do(Block),

    While {
        cond: Spanned<Expr>,
        body: Block,
    },

    Repeat {
        body: Block,
        cond: Spanned<Expr>,
    },

    /// `for var = start, stop, step do body end`
    ///
    /// An omitted step is filled in with the number `1`, positioned at the `for` keyword.
    NumericFor {
        var: Spanned<Name>,
        start: Spanned<Expr>,
        stop: Spanned<Expr>,
        step: Spanned<Expr>,
        body: Block,
    },

    /// `for vars in exprs do body end`
    GenericFor {
        vars: Vec<Spanned<Name>>,
        exprs: Vec<Spanned<Expr>>,
        body: Block,
    },

    /// `if`, any number of `elseif`s, and an optional `else`.
    If {
        clauses: Vec<IfClause>,
        else_body: Option<Block>,
    },

    Function {
        name: FuncName,
        body: FuncBody,
    },

    LocalFunction {
        name: Spanned<Name>,
        body: FuncBody,
    },

    /// `local names = exprs`
    ///
    /// `exprs` is padded with `nil` so that it is never shorter than `names`.
    Local {
        names: Vec<Spanned<Name>>,
        exprs: Vec<Spanned<Expr>>,
    },

    /// A function or method call used as a statement.
    Call(PrefixExp),

    /// `targets = exprs`
    ///
    /// `exprs` is padded with `nil` so that it is never shorter than `targets`.
    Assign {
        targets: Vec<Spanned<PrefixExp>>,
        exprs: Vec<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfClause {
    pub cond: Spanned<Expr>,
    pub body: Block,
}

/// The name of a `function` statement: `a.b.c` or `a.b:c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncName {
    pub path: Vec<Spanned<Name>>,
    pub method: Option<Spanned<Name>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncBody {
    pub params: Vec<Spanned<Name>>,

    /// The span of the trailing `...` parameter, if present.
    pub vararg: Option<Span>,

    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Nil,
    True,
    False,

    /// A number literal, as written.
    Number(String),

    /// A string literal, as written.
    Str(String),

    /// `...`
    Vararg,

    /// `function (params) body end`
    Function(FuncBody),

    Binop {
        op: Spanned<BinOp>,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },

    Unop {
        op: Spanned<UnOp>,
        operand: Box<Spanned<Expr>>,
    },

    Table(Vec<Spanned<Field>>),

    Prefix(PrefixExp),
}

/// A name or parenthesized expression followed by a chain of suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixExp {
    pub head: Spanned<Head>,
    pub suffixes: Vec<Spanned<Suffix>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Name(Name),
    Paren(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// `f(args)`
    Call(Args),

    /// `obj:name(args)`
    Method { name: Spanned<Name>, args: Args },

    /// `t[expr]`
    Index(Box<Spanned<Expr>>),

    /// `t.name`
    Field(Spanned<Name>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Args {
    List(Vec<Spanned<Expr>>),
    Table(Vec<Spanned<Field>>),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `[key] = value`
    Keyed {
        key: Spanned<Expr>,
        value: Spanned<Expr>,
    },

    /// `name = value`
    Named {
        name: Spanned<Name>,
        value: Spanned<Expr>,
    },

    /// `value`
    Positional(Spanned<Expr>),
}

/// Binary operator symbols.
///
/// Dialect spellings (`&&`, `||`, `!=`) map onto the same symbols as their Lua counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Or,
    And,
    Lt,
    Gt,
    Le,
    Ge,
    Ne,
    Eq,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Unary operator symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    /// `-`
    Neg,

    /// `not`, or `!` in the dialect
    Not,

    /// `#`
    Len,
}

impl Suffix {
    pub fn is_call(&self) -> bool {
        matches!(self, Suffix::Call(_) | Suffix::Method { .. })
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Suffix::Index(_) | Suffix::Field(_))
    }
}

impl PrefixExp {
    pub fn new(head: Spanned<Head>, suffixes: Vec<Spanned<Suffix>>) -> Self {
        Self { head, suffixes }
    }

    pub fn ends_in_call(&self) -> bool {
        self.suffixes.last().is_some_and(|s| s.node.is_call())
    }

    pub fn ends_in_index(&self) -> bool {
        self.suffixes.last().is_some_and(|s| s.node.is_index())
    }

    /// Is this a parenthesized expression with nothing after it, like `(x)`?
    pub fn is_bare_paren(&self) -> bool {
        self.suffixes.is_empty() && matches!(self.head.node, Head::Paren(_))
    }

    pub fn span(&self) -> Span {
        self.suffixes
            .last()
            .map_or(self.head.span, |last| self.head.span.join(last.span))
    }
}

impl Block {
    /// Append the statements of `other`, taking over its `return`.
    ///
    /// If `self` already ends in a `return`, `other` must be empty.
    pub fn append(&mut self, other: Block) {
        debug_assert!(self.ret.is_none() || (other.stmts.is_empty() && other.ret.is_none()));
        self.stmts.extend(other.stmts);
        if other.ret.is_some() {
            self.ret = other.ret;
        }
    }
}

impl Stmt {
    /// The target and value pairs of an assignment or local declaration.
    ///
    /// Surplus right-hand expressions, which are evaluated but not assigned, are not included.
    pub fn assignment_pairs(&self) -> Vec<(String, &Spanned<Expr>)> {
        match self {
            Stmt::Assign { targets, exprs } => targets
                .iter()
                .map(|t| t.node.to_string())
                .zip(exprs)
                .collect(),
            Stmt::Local { names, exprs } => names
                .iter()
                .map(|n| n.node.clone())
                .zip(exprs)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn starts_with_paren(&self) -> bool {
        match self {
            Stmt::Call(call) => matches!(call.head.node, Head::Paren(_)),
            Stmt::Assign { targets, .. } => targets
                .first()
                .is_some_and(|t| matches!(t.node.head.node, Head::Paren(_))),
            _ => false,
        }
    }
}

/// Constructors for expressions.
pub mod expr {
    use super::*;

    pub fn nil(span: Span) -> Spanned<Expr> {
        Expr::Nil.spanned(span)
    }

    pub fn binop(op: Spanned<BinOp>, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
        let span = lhs.span.join(rhs.span);
        Expr::Binop {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
        .spanned(span)
    }

    pub fn unop(op: Spanned<UnOp>, operand: Spanned<Expr>) -> Spanned<Expr> {
        let span = op.span.join(operand.span);
        Expr::Unop {
            op,
            operand: Box::new(operand),
        }
        .spanned(span)
    }

    pub fn prefix(prefix: PrefixExp) -> Spanned<Expr> {
        let span = prefix.span();
        Expr::Prefix(prefix).spanned(span)
    }

    /// Pad `exprs` with `nil`s at `at` until it is at least `len` long.
    pub fn pad_with_nil(exprs: &mut Vec<Spanned<Expr>>, len: usize, at: Span) {
        while exprs.len() < len {
            exprs.push(nil(at));
        }
    }
}

/// Constructors for statements.
pub mod stmt {
    use super::*;

    pub fn assign(targets: Vec<Spanned<PrefixExp>>, exprs: Vec<Spanned<Expr>>) -> Stmt {
        Stmt::Assign { targets, exprs }
    }

    pub fn local(names: Vec<Spanned<Name>>, exprs: Vec<Spanned<Expr>>) -> Stmt {
        Stmt::Local { names, exprs }
    }
}

// ---------------------------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------------------------

/// `Display`s a slice separated by `", "`.
struct Commas<'a, T>(&'a [T]);

impl<T: Display> Display for Commas<'_, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Write `[expr]`, padding with spaces when the expression would otherwise merge with the
/// bracket into a long string opener.
fn write_bracketed(f: &mut Formatter, expr: &Expr) -> fmt::Result {
    let inner = expr.to_string();
    if inner.starts_with('[') {
        write!(f, "[ {inner} ]")
    } else {
        write!(f, "[{inner}]")
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.block)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for stmt in &self.stmts {
            // Keeps `(f)()` from being read as a call on the previous line's last expression.
            if stmt.node.starts_with_paren() {
                f.write_str(";")?;
            }
            writeln!(f, "{}", stmt.node)?;
        }
        if let Some(ret) = &self.ret {
            writeln!(f, "{}", ret.node)?;
        }
        Ok(())
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.exprs.is_empty() {
            write!(f, "return")
        } else {
            write!(f, "return {}", Commas(&self.exprs))
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Stmt::Label(name) => write!(f, "::{name}::"),
            Stmt::Break => write!(f, "break"),
            Stmt::Continue => write!(f, "continue"),
            Stmt::Goto(name) => write!(f, "goto {name}"),
            Stmt::Do(body) => write!(f, "do\n{body}end"),
            Stmt::While { cond, body } => write!(f, "while {cond} do\n{body}end"),
            Stmt::Repeat { body, cond } => write!(f, "repeat\n{body}until {cond}"),
            Stmt::NumericFor {
                var,
                start,
                stop,
                step,
                body,
            } => write!(f, "for {var} = {start}, {stop}, {step} do\n{body}end"),
            Stmt::GenericFor { vars, exprs, body } => {
                write!(f, "for {} in {} do\n{body}end", Commas(vars), Commas(exprs))
            }
            Stmt::If { clauses, else_body } => {
                for (i, clause) in clauses.iter().enumerate() {
                    let kw = if i == 0 { "if" } else { "elseif" };
                    write!(f, "{kw} {} then\n{}", clause.cond, clause.body)?;
                }
                if let Some(body) = else_body {
                    write!(f, "else\n{body}")?;
                }
                write!(f, "end")
            }
            Stmt::Function { name, body } => write!(f, "function {name}{body}"),
            Stmt::LocalFunction { name, body } => write!(f, "local function {name}{body}"),
            Stmt::Local { names, exprs } if exprs.is_empty() => {
                write!(f, "local {}", Commas(names))
            }
            Stmt::Local { names, exprs } => {
                write!(f, "local {} = {}", Commas(names), Commas(exprs))
            }
            Stmt::Call(call) => write!(f, "{call}"),
            Stmt::Assign { targets, exprs } => {
                write!(f, "{} = {}", Commas(targets), Commas(exprs))
            }
        }
    }
}

impl Display for FuncName {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, part) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        if let Some(method) = &self.method {
            write!(f, ":{method}")?;
        }
        Ok(())
    }
}

impl Display for FuncBody {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}", Commas(&self.params))?;
        if self.vararg.is_some() {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("...")?;
        }
        write!(f, ")\n{}end", self.body)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expr::Nil => write!(f, "nil"),
            Expr::True => write!(f, "true"),
            Expr::False => write!(f, "false"),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Str(s) => write!(f, "{s}"),
            Expr::Vararg => write!(f, "..."),
            Expr::Function(body) => write!(f, "function{body}"),
            Expr::Binop { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Expr::Unop { op, operand } => match op.node {
                UnOp::Not => write!(f, "not {operand}"),
                UnOp::Len => write!(f, "#{operand}"),
                UnOp::Neg => {
                    // `--` would start a comment.
                    let operand = operand.to_string();
                    if operand.starts_with('-') {
                        write!(f, "- {operand}")
                    } else {
                        write!(f, "-{operand}")
                    }
                }
            },
            Expr::Table(fields) => write!(f, "{{{}}}", Commas(fields)),
            Expr::Prefix(prefix) => write!(f, "{prefix}"),
        }
    }
}

impl Display for PrefixExp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.head.node {
            Head::Name(name) => write!(f, "{name}")?,
            Head::Paren(expr) => write!(f, "({expr})")?,
        }
        for suffix in &self.suffixes {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl Display for Suffix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Suffix::Call(args) => write!(f, "{args}"),
            Suffix::Method { name, args } => write!(f, ":{name}{args}"),
            Suffix::Index(expr) => write_bracketed(f, &expr.node),
            Suffix::Field(name) => write!(f, ".{name}"),
        }
    }
}

impl Display for Args {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Args::List(exprs) => write!(f, "({})", Commas(exprs)),
            Args::Table(fields) => write!(f, "{{{}}}", Commas(fields)),
            Args::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Field::Keyed { key, value } => {
                write_bracketed(f, &key.node)?;
                write!(f, " = {value}")
            }
            Field::Named { name, value } => write!(f, "{name} = {value}"),
            Field::Positional(value) => write!(f, "{value}"),
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Ne => "~=",
            BinOp::Eq => "==",
            BinOp::Concat => "..",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        };
        f.write_str(s)
    }
}

impl Display for UnOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
            UnOp::Len => "#",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------------------------
// Structural equality
// ---------------------------------------------------------------------------------------------

/// Equality of syntax trees, ignoring spans.
pub trait SynEq {
    fn syn_eq(&self, other: &Self) -> bool;
}

macro_rules! syn_eq_by_partial_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SynEq for $ty {
                fn syn_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

syn_eq_by_partial_eq!(String, BinOp, UnOp, Comment);

impl SynEq for Span {
    fn syn_eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T: SynEq> SynEq for Spanned<T> {
    fn syn_eq(&self, other: &Self) -> bool {
        self.node.syn_eq(&other.node)
    }
}

impl<T: SynEq> SynEq for Box<T> {
    fn syn_eq(&self, other: &Self) -> bool {
        (**self).syn_eq(&**other)
    }
}

impl<T: SynEq> SynEq for Option<T> {
    fn syn_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.syn_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: SynEq> SynEq for Vec<T> {
    fn syn_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.syn_eq(b))
    }
}

impl SynEq for Chunk {
    fn syn_eq(&self, other: &Self) -> bool {
        self.comments.syn_eq(&other.comments) && self.block.syn_eq(&other.block)
    }
}

impl SynEq for Block {
    fn syn_eq(&self, other: &Self) -> bool {
        self.stmts.syn_eq(&other.stmts) && self.ret.syn_eq(&other.ret)
    }
}

impl SynEq for Return {
    fn syn_eq(&self, other: &Self) -> bool {
        self.exprs.syn_eq(&other.exprs)
    }
}

impl SynEq for IfClause {
    fn syn_eq(&self, other: &Self) -> bool {
        self.cond.syn_eq(&other.cond) && self.body.syn_eq(&other.body)
    }
}

impl SynEq for FuncName {
    fn syn_eq(&self, other: &Self) -> bool {
        self.path.syn_eq(&other.path) && self.method.syn_eq(&other.method)
    }
}

impl SynEq for FuncBody {
    fn syn_eq(&self, other: &Self) -> bool {
        self.params.syn_eq(&other.params)
            && self.vararg.syn_eq(&other.vararg)
            && self.body.syn_eq(&other.body)
    }
}

impl SynEq for Stmt {
    fn syn_eq(&self, other: &Self) -> bool {
        use Stmt::*;

        match (self, other) {
            (Label(a), Label(b)) => a == b,
            (Break, Break) | (Continue, Continue) => true,
            (Goto(a), Goto(b)) => a.syn_eq(b),
            (Do(a), Do(b)) => a.syn_eq(b),
            (While { cond: c1, body: b1 }, While { cond: c2, body: b2 })
            | (Repeat { cond: c1, body: b1 }, Repeat { cond: c2, body: b2 }) => {
                c1.syn_eq(c2) && b1.syn_eq(b2)
            }
            (
                NumericFor {
                    var: v1,
                    start: a1,
                    stop: z1,
                    step: s1,
                    body: b1,
                },
                NumericFor {
                    var: v2,
                    start: a2,
                    stop: z2,
                    step: s2,
                    body: b2,
                },
            ) => v1.syn_eq(v2) && a1.syn_eq(a2) && z1.syn_eq(z2) && s1.syn_eq(s2) && b1.syn_eq(b2),
            (
                GenericFor {
                    vars: v1,
                    exprs: e1,
                    body: b1,
                },
                GenericFor {
                    vars: v2,
                    exprs: e2,
                    body: b2,
                },
            ) => v1.syn_eq(v2) && e1.syn_eq(e2) && b1.syn_eq(b2),
            (
                If {
                    clauses: c1,
                    else_body: e1,
                },
                If {
                    clauses: c2,
                    else_body: e2,
                },
            ) => c1.syn_eq(c2) && e1.syn_eq(e2),
            (Function { name: n1, body: b1 }, Function { name: n2, body: b2 }) => {
                n1.syn_eq(n2) && b1.syn_eq(b2)
            }
            (LocalFunction { name: n1, body: b1 }, LocalFunction { name: n2, body: b2 }) => {
                n1.syn_eq(n2) && b1.syn_eq(b2)
            }
            (Local { names: n1, exprs: e1 }, Local { names: n2, exprs: e2 }) => {
                n1.syn_eq(n2) && e1.syn_eq(e2)
            }
            (Call(a), Call(b)) => a.syn_eq(b),
            (
                Assign {
                    targets: t1,
                    exprs: e1,
                },
                Assign {
                    targets: t2,
                    exprs: e2,
                },
            ) => t1.syn_eq(t2) && e1.syn_eq(e2),
            _ => false,
        }
    }
}

impl SynEq for Expr {
    fn syn_eq(&self, other: &Self) -> bool {
        use Expr::*;

        match (self, other) {
            (Nil, Nil) | (True, True) | (False, False) | (Vararg, Vararg) => true,
            (Number(a), Number(b)) | (Str(a), Str(b)) => a == b,
            (Function(a), Function(b)) => a.syn_eq(b),
            (
                Binop {
                    op: o1,
                    lhs: l1,
                    rhs: r1,
                },
                Binop {
                    op: o2,
                    lhs: l2,
                    rhs: r2,
                },
            ) => o1.syn_eq(o2) && l1.syn_eq(l2) && r1.syn_eq(r2),
            (
                Unop {
                    op: o1,
                    operand: a1,
                },
                Unop {
                    op: o2,
                    operand: a2,
                },
            ) => o1.syn_eq(o2) && a1.syn_eq(a2),
            (Table(a), Table(b)) => a.syn_eq(b),
            (Prefix(a), Prefix(b)) => a.syn_eq(b),
            _ => false,
        }
    }
}

impl SynEq for PrefixExp {
    fn syn_eq(&self, other: &Self) -> bool {
        self.head.syn_eq(&other.head) && self.suffixes.syn_eq(&other.suffixes)
    }
}

impl SynEq for Head {
    fn syn_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Head::Name(a), Head::Name(b)) => a == b,
            (Head::Paren(a), Head::Paren(b)) => a.syn_eq(b),
            _ => false,
        }
    }
}

impl SynEq for Suffix {
    fn syn_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Suffix::Call(a), Suffix::Call(b)) => a.syn_eq(b),
            (
                Suffix::Method { name: n1, args: a1 },
                Suffix::Method { name: n2, args: a2 },
            ) => n1.syn_eq(n2) && a1.syn_eq(a2),
            (Suffix::Index(a), Suffix::Index(b)) => a.syn_eq(b),
            (Suffix::Field(a), Suffix::Field(b)) => a.syn_eq(b),
            _ => false,
        }
    }
}

impl SynEq for Args {
    fn syn_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Args::List(a), Args::List(b)) => a.syn_eq(b),
            (Args::Table(a), Args::Table(b)) => a.syn_eq(b),
            (Args::Str(a), Args::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl SynEq for Field {
    fn syn_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::Keyed { key: k1, value: v1 }, Field::Keyed { key: k2, value: v2 }) => {
                k1.syn_eq(k2) && v1.syn_eq(v2)
            }
            (Field::Named { name: n1, value: v1 }, Field::Named { name: n2, value: v2 }) => {
                n1.syn_eq(n2) && v1.syn_eq(v2)
            }
            (Field::Positional(a), Field::Positional(b)) => a.syn_eq(b),
            _ => false,
        }
    }
}
