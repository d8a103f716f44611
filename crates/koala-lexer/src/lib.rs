//! KoalaCode lexer: converts source text into tokens.
use koala_syntax::error::{error_at, ErrorKind, Result};
use koala_syntax::token::{Token, TokenKind};
use koala_syntax::Span;

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            src: normalized.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\n' {
                self.advance();
            } else if c == '#' {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match s.parse::<i64>() {
            Ok(val) => Ok(TokenKind::Number(val)),
            Err(_) => error_at(ErrorKind::Lex, Span::new(line, col), format!("Invalid number {}", s)),
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::keyword(&s).unwrap_or(TokenKind::Ident(s))
    }

    /// Reads up to the closing quote. There are no escape sequences.
    fn read_string(&mut self, line: usize, col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.advance() {
            if c == '"' {
                return Ok(TokenKind::String(s));
            }
            s.push(c);
        }
        error_at(ErrorKind::Lex, Span::new(line, col), "Unterminated string")
    }

    fn two_char_op(&mut self, first: char) -> Option<String> {
        let pair = match (first, self.peek_next()?) {
            ('=', '=') => "==",
            ('!', '=') => "!=",
            ('<', '=') => "<=",
            ('>', '=') => ">=",
            ('&', '&') => "&&",
            ('|', '|') => "||",
            _ => return None,
        };
        self.advance();
        self.advance();
        Some(pair.to_string())
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let Some(c) = self.peek() else {
                tokens.push(Token { kind: TokenKind::Eof, line, col });
                break;
            };
            let kind = match c {
                '"' => {
                    self.advance();
                    self.read_string(line, col)?
                }
                c if c.is_ascii_digit() => self.read_number(line, col)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                '=' | '!' | '<' | '>' | '&' | '|' => {
                    if let Some(op) = self.two_char_op(c) {
                        TokenKind::Op(op)
                    } else if c == '=' {
                        self.advance();
                        TokenKind::Assign
                    } else if c == '&' || c == '|' {
                        return error_at(
                            ErrorKind::Lex,
                            Span::new(line, col),
                            format!("Unexpected '{}' (did you mean '{}{}'?)", c, c, c),
                        );
                    } else {
                        self.advance();
                        TokenKind::Op(c.to_string())
                    }
                }
                '+' | '-' | '*' | '/' => {
                    self.advance();
                    TokenKind::Op(c.to_string())
                }
                ';' | ',' | '(' | ')' | '{' | '}' | '[' | ']' => {
                    self.advance();
                    match c {
                        ';' => TokenKind::Semi,
                        ',' => TokenKind::Comma,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '[' => TokenKind::LBracket,
                        _ => TokenKind::RBracket,
                    }
                }
                other => {
                    return error_at(
                        ErrorKind::Lex,
                        Span::new(line, col),
                        format!("Unexpected character '{}'", other),
                    );
                }
            };
            tokens.push(Token { kind, line, col });
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("give take this otherwise iter iter2 func return true false koala"),
            vec![
                TokenKind::Give,
                TokenKind::Take,
                TokenKind::This,
                TokenKind::Otherwise,
                TokenKind::Iter,
                TokenKind::Iter2,
                TokenKind::Func,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Ident("koala".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        let ops: Vec<String> = kinds("== != <= >= && || + - * / < > !")
            .into_iter()
            .filter_map(|k| match k {
                TokenKind::Op(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec!["==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "<", ">", "!"]);
    }

    #[test]
    fn test_assignment_statement() {
        assert_eq!(
            kinds("x = 42;"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Number(42),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_and_comments() {
        assert_eq!(
            kinds("give(\"hi there\"); # trailing comment\n"),
            vec![
                TokenKind::Give,
                TokenKind::LParen,
                TokenKind::String("hi there".to_string()),
                TokenKind::RParen,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let tokens = Lexer::new("a = 1;\r\n  b = 2;").tokenize().unwrap();
        let b = tokens.iter().find(|t| t.kind == TokenKind::Ident("b".into())).unwrap();
        assert_eq!((b.line, b.col), (2, 3));
    }

    #[test]
    fn test_errors() {
        let err = Lexer::new("x = 1 @ 2;").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!((err.line, err.col), (Some(1), Some(7)));

        let err = Lexer::new("give(\"open);").tokenize().unwrap_err();
        assert!(err.msg.contains("Unterminated string"));

        assert!(Lexer::new("a & b").tokenize().is_err());

        let err = Lexer::new("x =\n  99999999999999999999;").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!((err.line, err.col), (Some(2), Some(3)));
        assert!(err.msg.contains("Invalid number"));
    }
}
