//! Token definitions produced by the KoalaCode lexer.

use crate::ast::Span;

/// Token types that can be produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    Ident(String),
    /// Non-negative integer literal; a leading `-` is a separate token.
    Number(i64),
    /// String literal with the surrounding quotes removed.
    String(String),

    // === Keywords ===
    /// `give` - print a value
    Give,
    /// `take` - read a line of input
    Take,
    /// `this` - conditional
    This,
    /// `otherwise` - alternative branch of `this`
    Otherwise,
    /// `iter` - while-style loop
    Iter,
    /// `iter2` - for-style loop with init, condition and step
    Iter2,
    True,
    False,
    Func,
    Return,

    // === Punctuation ===
    Assign,
    Semi,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // === Operators ===
    /// Any operator symbol: `+ - * / < > <= >= == != && || !`
    Op(String),

    Eof,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        Some(match word {
            "give" => TokenKind::Give,
            "take" => TokenKind::Take,
            "this" => TokenKind::This,
            "otherwise" => TokenKind::Otherwise,
            "iter" => TokenKind::Iter,
            "iter2" => TokenKind::Iter2,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            _ => return None,
        })
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier '{}'", s),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::String(s) => format!("string \"{}\"", s),
            TokenKind::Give => "'give'".into(),
            TokenKind::Take => "'take'".into(),
            TokenKind::This => "'this'".into(),
            TokenKind::Otherwise => "'otherwise'".into(),
            TokenKind::Iter => "'iter'".into(),
            TokenKind::Iter2 => "'iter2'".into(),
            TokenKind::True => "'true'".into(),
            TokenKind::False => "'false'".into(),
            TokenKind::Func => "'func'".into(),
            TokenKind::Return => "'return'".into(),
            TokenKind::Assign => "'='".into(),
            TokenKind::Semi => "';'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::LBracket => "'['".into(),
            TokenKind::RBracket => "']'".into(),
            TokenKind::Op(op) => format!("'{}'", op),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Line number in the source file (1-based)
    pub line: usize,
    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.line, self.col)
    }
}
