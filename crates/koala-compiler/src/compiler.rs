//! Bytecode compiler from syntax tree to [`Program`].

use std::collections::HashSet;

use koala_bytecode::{
    Constant, Function as BcFunction, FunctionTable, Instruction as BC, Program as BcProgram, LEN_INTRINSIC,
};
use koala_syntax::ast::*;
use koala_syntax::error::{error_at, ErrorKind, Result};
use log::debug;

use crate::builder::FuncBuilder;

/// Translates statements into bytecode, accumulating a function table.
///
/// The table survives across [`Compiler::compile`] calls so a REPL session can
/// define a function in one input and call it in the next.
pub struct Compiler {
    functions: FunctionTable,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self { functions: FunctionTable::new() }
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut v: Vec<String> = self.functions.keys().cloned().collect();
        v.sort();
        v
    }

    /// Forget every function defined so far.
    pub fn reset(&mut self) {
        self.functions.clear();
    }

    /// Compiles a top-level statement list as one block.
    ///
    /// On failure the function table is left as it was before the call.
    pub fn compile(&mut self, program: &[Stmt]) -> Result<BcProgram> {
        let saved = self.functions.clone();
        let mut main_builder = FuncBuilder::new(false);
        for s in program {
            if let Err(e) = main_builder.emit_stmt(self, s) {
                self.functions = saved;
                return Err(e);
            }
        }
        let code = main_builder.finish();
        debug!(
            "compiled {} top-level instructions, {} functions in table",
            code.len(),
            self.functions.len()
        );
        let program = BcProgram::new(code, self.functions.clone());
        debug_assert!(program.main.jumps_in_bounds());
        Ok(program)
    }

    /// Compiles a function body into its own instruction sequence and registers it.
    pub(crate) fn define(&mut self, name: &str, params: &[String], body: &Stmt, span: Span) -> Result<()> {
        if name == LEN_INTRINSIC {
            return error_at(ErrorKind::Compile, span, format!("cannot redefine built-in '{}'", name));
        }
        let mut seen = HashSet::new();
        for p in params {
            if !seen.insert(p.as_str()) {
                return error_at(
                    ErrorKind::Compile,
                    span,
                    format!("duplicate parameter '{}' in function '{}'", p, name),
                );
            }
        }

        let mut b = FuncBuilder::new(true);
        b.emit_stmt(self, body)?;
        // implicit `return nil` for bodies that fall through
        b.emit(BC::PushConst(Constant::Nil));
        b.emit(BC::Return);
        let code = b.finish();

        debug!("registered function {}/{} ({} instructions)", name, params.len(), code.len());
        let function = BcFunction::new(name, params.to_vec(), code);
        debug_assert!(function.jumps_in_bounds());
        self.functions.insert(name.to_string(), function);
        Ok(())
    }
}
