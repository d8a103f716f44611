//! Recursive-descent parser producing the KoalaCode syntax tree.

use koala_syntax::ast::*;
use koala_syntax::error::{error_at, ErrorKind, Result};
use koala_syntax::token::{Token, TokenKind};

/// Operators accepted at the comparison level. They all share one precedence.
const COMPARISON_OPS: &[&str] = &["<", ">", "<=", ">=", "==", "!=", "&&", "||"];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// A trailing `Eof` token is added if the input lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, col) = tokens.last().map(|t| (t.line, t.col)).unwrap_or((1, 1));
            tokens.push(Token { kind: TokenKind::Eof, line, col });
        }
        Self { tokens, pos: 0 }
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Token {
        let tok = self.cur().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.cur().kind == kind
    }

    fn unexpected<T>(&self, what: &str) -> Result<T> {
        let tok = self.cur();
        error_at(
            ErrorKind::Parse,
            tok.span(),
            format!("Expected {}, found {}", what, tok.kind.describe()),
        )
    }

    fn eat(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            self.unexpected(&kind.describe())
        }
    }

    fn ident(&mut self) -> Result<(String, Span)> {
        let tok = self.cur().clone();
        let span = tok.span();
        match tok.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, span))
            }
            _ => self.unexpected("identifier"),
        }
    }

    fn is_op(&self, ops: &[&str]) -> bool {
        matches!(&self.cur().kind, TokenKind::Op(op) if ops.contains(&op.as_str()))
    }

    /// Parses statements until end of input.
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        let span = self.cur().span();
        match self.cur().kind.clone() {
            TokenKind::Func => {
                self.advance();
                let (name, _) = self.ident()?;
                self.eat(TokenKind::LParen)?;
                let mut params = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    params.push(self.ident()?.0);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        params.push(self.ident()?.0);
                    }
                }
                self.eat(TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::FuncDef { name, params, body, span })
            }
            TokenKind::Return => {
                self.advance();
                let value = self.parse_expr()?;
                self.eat(TokenKind::Semi)?;
                Ok(Stmt::Return { value, span })
            }
            TokenKind::Give => {
                self.advance();
                self.eat(TokenKind::LParen)?;
                let expr = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                self.eat(TokenKind::Semi)?;
                Ok(Stmt::Give { expr, span })
            }
            TokenKind::This => {
                self.advance();
                self.eat(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.check(&TokenKind::Otherwise) {
                    self.advance();
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(Stmt::If { cond, then_branch, else_branch, span })
            }
            TokenKind::Iter => {
                self.advance();
                self.eat(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While { cond, body, span })
            }
            TokenKind::Iter2 => {
                self.advance();
                self.eat(TokenKind::LParen)?;
                let init = Box::new(self.parse_assignment()?);
                self.eat(TokenKind::Semi)?;
                let cond = self.parse_expr()?;
                self.eat(TokenKind::Semi)?;
                let step = Box::new(self.parse_assignment()?);
                self.eat(TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::For { init, cond, step, body, span })
            }
            TokenKind::LBrace => {
                self.advance();
                let mut stmts = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    if self.check(&TokenKind::Eof) {
                        return self.unexpected("'}'");
                    }
                    stmts.push(self.parse_stmt()?);
                }
                self.eat(TokenKind::RBrace)?;
                Ok(Stmt::Block { stmts, span })
            }
            TokenKind::Ident(_) if self.peek_kind(1) == Some(&TokenKind::Assign) => {
                let stmt = self.parse_assignment()?;
                self.eat(TokenKind::Semi)?;
                Ok(stmt)
            }
            TokenKind::Ident(name) if self.peek_kind(1) == Some(&TokenKind::LBracket) => {
                // `a[i] = v;` and `a[i] + 1;` share a prefix; rewind if no `=` follows.
                let start = self.pos;
                self.advance();
                self.advance();
                let index = self.parse_expr()?;
                self.eat(TokenKind::RBracket)?;
                if self.check(&TokenKind::Assign) {
                    self.advance();
                    let value = self.parse_expr()?;
                    self.eat(TokenKind::Semi)?;
                    return Ok(Stmt::AssignIndex { name, index, value, span });
                }
                self.pos = start;
                self.parse_expr_stmt()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let span = self.cur().span();
        let expr = self.parse_expr()?;
        self.eat(TokenKind::Semi)?;
        Ok(Stmt::Expr { expr, span })
    }

    /// `name = expr` without the trailing semicolon; used by `iter2` headers.
    fn parse_assignment(&mut self) -> Result<Stmt> {
        let (name, span) = self.ident()?;
        self.eat(TokenKind::Assign)?;
        let expr = self.parse_expr()?;
        Ok(Stmt::Assign { name, expr, span })
    }

    /// Parses a full expression (the comparison level).
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let mut node = self.parse_sum()?;
        while self.is_op(COMPARISON_OPS) {
            node = self.binary_tail(node, Self::parse_sum)?;
        }
        Ok(node)
    }

    fn parse_sum(&mut self) -> Result<Expr> {
        let mut node = self.parse_term()?;
        while self.is_op(&["+", "-"]) {
            node = self.binary_tail(node, Self::parse_term)?;
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut node = self.parse_factor()?;
        while self.is_op(&["*", "/"]) {
            node = self.binary_tail(node, Self::parse_factor)?;
        }
        Ok(node)
    }

    /// Consumes the operator at the cursor and its right operand.
    fn binary_tail(&mut self, left: Expr, rhs: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        let tok = self.advance();
        let op = match &tok.kind {
            TokenKind::Op(s) => BinOp::from_symbol(s),
            _ => None,
        };
        let Some(op) = op else {
            return error_at(ErrorKind::Parse, tok.span(), format!("Unknown operator {}", tok.kind.describe()));
        };
        let right = rhs(self)?;
        Ok(Expr::Binary { op, left: Box::new(left), right: Box::new(right), span: tok.span() })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        self.eat(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.eat(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        let tok = self.cur().clone();
        let span = tok.span();
        match tok.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Num { value, span })
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expr::Str { value, span })
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::Bool { value: tok.kind == TokenKind::True, span })
            }
            TokenKind::Take => {
                self.advance();
                self.eat(TokenKind::LParen)?;
                self.eat(TokenKind::RParen)?;
                Ok(Expr::Take { span })
            }
            TokenKind::Op(ref op) if op == "-" => {
                self.advance();
                match self.parse_factor()? {
                    Expr::Num { value, .. } => Ok(Expr::Num { value: -value, span }),
                    operand => Ok(Expr::Binary {
                        op: BinOp::Sub,
                        left: Box::new(Expr::Num { value: 0, span }),
                        right: Box::new(operand),
                        span,
                    }),
                }
            }
            TokenKind::Ident(name) => {
                self.advance();
                match self.cur().kind {
                    TokenKind::LBracket => {
                        self.advance();
                        let index = Box::new(self.parse_expr()?);
                        self.eat(TokenKind::RBracket)?;
                        Ok(Expr::Index { name, index, span })
                    }
                    TokenKind::LParen => {
                        let args = self.parse_args()?;
                        Ok(Expr::Call { name, args, span })
                    }
                    _ => Ok(Expr::Var { name, span }),
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elems = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    elems.push(self.parse_expr()?);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        elems.push(self.parse_expr()?);
                    }
                }
                self.eat(TokenKind::RBracket)?;
                Ok(Expr::Array { elems, span })
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                Ok(node)
            }
            other => error_at(ErrorKind::Parse, span, format!("Unexpected token {}", other.describe())),
        }
    }
}
