//! Syntax tree types for KoalaCode.
//!
//! The parser hands the compiler a list of [`Stmt`]s. Every node records the
//! source position it was parsed from so later stages can point at it.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Binary operators. All of them evaluate both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        Some(match s {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            _ => return None,
        })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expressions: every one leaves exactly one value behind when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num { value: i64, span: Span },
    Str { value: String, span: Span },
    Bool { value: bool, span: Span },
    Var { name: String, span: Span },
    Array { elems: Vec<Expr>, span: Span },
    /// `name[index]`; only named arrays can be indexed.
    Index { name: String, index: Box<Expr>, span: Span },
    /// `take()`: one line from the input channel.
    Take { span: Span },
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr>, span: Span },
    Call { name: String, args: Vec<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Num { span, .. }
            | Expr::Str { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Var { span, .. }
            | Expr::Array { span, .. }
            | Expr::Index { span, .. }
            | Expr::Take { span }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. } => *span,
        }
    }
}

/// Statements: none of them leaves a value behind.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block { stmts: Vec<Stmt>, span: Span },
    /// `give(expr);`
    Give { expr: Expr, span: Span },
    Assign { name: String, expr: Expr, span: Span },
    AssignIndex { name: String, index: Expr, value: Expr, span: Span },
    /// `this (cond) ... otherwise ...`
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>>, span: Span },
    /// `iter (cond) body`
    While { cond: Expr, body: Box<Stmt>, span: Span },
    /// `iter2 (init; cond; step) body`
    For { init: Box<Stmt>, cond: Expr, step: Box<Stmt>, body: Box<Stmt>, span: Span },
    FuncDef { name: String, params: Vec<String>, body: Box<Stmt>, span: Span },
    Return { value: Expr, span: Span },
    /// An expression evaluated for its side effects; the value is discarded.
    Expr { expr: Expr, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block { span, .. }
            | Stmt::Give { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::AssignIndex { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::For { span, .. }
            | Stmt::FuncDef { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Expr { span, .. } => *span,
        }
    }
}
