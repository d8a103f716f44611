//! Error types shared by every stage of the KoalaCode toolchain.
//!
//! There is one [`Error`] type for the whole pipeline. Its [`ErrorKind`] says
//! which stage failed; runtime failures additionally carry a [`Fault`] naming
//! what went wrong. Nothing in the core prints or recovers from an error: each
//! stage returns it and the host decides how to render it.
//!
//! # Examples
//!
//! ```rust
//! use koala_syntax::error::{Error, ErrorKind, Fault, Result, runtime};
//! use koala_syntax::Span;
//!
//! fn lookup(name: &str) -> Result<i64> {
//!     runtime(Fault::Undefined, format!("Undefined variable {}", name))
//! }
//!
//! let err = lookup("x").unwrap_err();
//! assert_eq!(err.fault(), Some(Fault::Undefined));
//!
//! let located = Error::new(ErrorKind::Parse, "Expected ';'").at(Span::new(3, 7));
//! assert_eq!(located.to_string(), "Expected ';' at 3:7");
//! ```

use crate::ast::Span;

/// What went wrong during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// Unbound variable, array or function name.
    #[error("undefined name")]
    Undefined,
    /// Call with the wrong number of arguments.
    #[error("arity mismatch")]
    Arity,
    /// Array or text index outside `0..len`.
    #[error("index out of bounds")]
    OutOfBounds,
    /// Operator or instruction applied to values of the wrong kind.
    #[error("invalid operands")]
    InvalidOperands,
    /// Division by zero or integer overflow.
    #[error("arithmetic error")]
    Arithmetic,
    /// The input or output channel failed.
    #[error("i/o failure")]
    Io,
    /// Malformed bytecode: stack underflow, return at top level, bad jump.
    #[error("internal error")]
    Internal,
}

/// The pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("Lex error")]
    Lex,
    #[error("Parse error")]
    Parse,
    #[error("Compile error")]
    Compile,
    #[error("Runtime error")]
    Runtime(Fault),
}

/// An error produced anywhere between source text and program output.
///
/// `line` and `col` are 1-based and present whenever the failing construct
/// has a source position. Runtime errors have none, since instructions do not
/// carry positions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}{}", location(.line, .col))]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
    pub line: Option<usize>,
    pub col: Option<usize>,
}

fn location(line: &Option<usize>, col: &Option<usize>) -> String {
    match (line, col) {
        (Some(l), Some(c)) => format!(" at {}:{}", l, c),
        _ => String::new(),
    }
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, msg: msg.into(), line: None, col: None }
    }

    pub fn runtime(fault: Fault, msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime(fault), msg)
    }

    /// Attaches a source position, replacing any previous one.
    pub fn at(mut self, span: Span) -> Self {
        self.line = Some(span.line);
        self.col = Some(span.col);
        self
    }

    /// The runtime fault, if this is a runtime error.
    pub fn fault(&self) -> Option<Fault> {
        match self.kind {
            ErrorKind::Runtime(f) => Some(f),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::runtime(Fault::Io, format!("IO error: {}", e))
    }
}

/// A specialized `Result` type for KoalaCode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Shorthand for a positioned error result.
pub fn error_at<T>(kind: ErrorKind, span: Span, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg).at(span))
}

/// Shorthand for a runtime failure result.
pub fn runtime<T>(fault: Fault, msg: impl Into<String>) -> Result<T> {
    Err(Error::runtime(fault, msg))
}
