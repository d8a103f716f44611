//! Program components for KoalaCode bytecode.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::instruction::Instruction;

/// A compiled instruction sequence with its declared parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub code: Vec<Instruction>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, code: Vec<Instruction>) -> Self {
        Self { name: name.into(), params, code }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// True when every jump lands inside this function's own code.
    ///
    /// A target equal to `code.len()` is allowed: it means "fall off the end".
    pub fn jumps_in_bounds(&self) -> bool {
        self.code
            .iter()
            .filter_map(Instruction::jump_target)
            .all(|t| t <= self.code.len())
    }

    fn write_listing(&self, out: &mut String) {
        let _ = writeln!(out, "{}({}):", self.name, self.params.join(", "));
        for (i, ins) in self.code.iter().enumerate() {
            let _ = writeln!(out, "  {:4}  {}", i, ins);
        }
    }
}

/// Name -> compiled function. A later definition replaces an earlier one.
pub type FunctionTable = HashMap<String, Function>;

/// Compiler output: the top-level code plus every function it defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub main: Function,
    pub functions: FunctionTable,
}

impl Program {
    pub const MAIN: &'static str = "<main>";

    pub fn new(code: Vec<Instruction>, functions: FunctionTable) -> Self {
        Self { main: Function::new(Self::MAIN, Vec::new(), code), functions }
    }

    /// Human-readable listing: `<main>` first, then functions sorted by name.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        self.main.write_listing(&mut out);
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        for name in names {
            out.push('\n');
            self.functions[name].write_listing(&mut out);
        }
        out
    }
}
