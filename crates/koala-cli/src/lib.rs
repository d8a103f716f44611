//! Hosting helpers for KoalaCode: the pieces the `koala` binary is built from.

pub mod common;

use std::io::Cursor;

use koala_bytecode::Program;
use koala_compiler::Compiler;
use koala_lexer::Lexer;
use koala_parser::Parser;
use koala_syntax::error::Result;
use koala_syntax::Stmt;
use koala_vm::Vm;

/// Lexes and parses `src` into top-level statements.
pub fn parse_source(src: &str) -> Result<Vec<Stmt>> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_program()
}

/// Parses `src` and compiles it against `compiler`'s function table.
pub fn compile_source(compiler: &mut Compiler, src: &str) -> Result<Program> {
    let stmts = parse_source(src)?;
    compiler.compile(&stmts)
}

/// Runs `code` in a fresh compiler and VM with in-memory I/O.
///
/// `input` feeds `take()`. Returns the trimmed output, `"No output"` when
/// nothing was printed, or `"Error: ..."` when any stage fails.
pub fn run_source(code: &str, input: &str) -> String {
    let stmts = match parse_source(code) {
        Ok(stmts) => stmts,
        Err(e) => return format!("Error: {}", e),
    };
    if stmts.is_empty() {
        return "No code to run.".to_string();
    }

    let mut out = Vec::new();
    let result = Compiler::new()
        .compile(&stmts)
        .and_then(|program| Vm::with_io(Cursor::new(input.as_bytes().to_vec()), &mut out).run(&program));
    if let Err(e) = result {
        return format!("Error: {}", e);
    }

    let captured = String::from_utf8_lossy(&out);
    let captured = captured.trim();
    if captured.is_empty() {
        "No output".to_string()
    } else {
        captured.to_string()
    }
}
