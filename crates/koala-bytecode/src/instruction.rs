//! Instruction set for KoalaCode bytecode.

use std::fmt;

use koala_syntax::ast::BinOp;

/// Literal operand of `PushConst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Int(i64),
    Str(String),
    Bool(bool),
    Nil,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "{}", n),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Constants
    PushConst(Constant),

    // Stack
    Pop,

    // Variables (current frame only)
    LoadVar(String),
    StoreVar(String),

    // Arrays
    BuildArray(usize),  // pops N items -> pushes array in original order
    LoadIndex(String),  // pops index -> pushes element of the named array
    StoreIndex(String), // pops value, then index

    // I/O
    Print,
    Input,

    // Operators: pops right, then left
    BinaryOp(BinOp),

    // Control flow (absolute instruction index targets)
    Jump(usize),
    JumpIfFalse(usize),

    // Functions
    MakeFunc(String), // no-op marker; registration happens at compile time
    CallFunc { name: String, argc: usize },
    Return, // expects the return value on the stack
}

impl Instruction {
    /// The jump target, if this is a jump.
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Instruction::Jump(t) | Instruction::JumpIfFalse(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushConst(c) => write!(f, "PUSH_CONST {}", c),
            Instruction::Pop => write!(f, "POP"),
            Instruction::LoadVar(n) => write!(f, "LOAD_VAR {}", n),
            Instruction::StoreVar(n) => write!(f, "STORE_VAR {}", n),
            Instruction::BuildArray(n) => write!(f, "BUILD_ARRAY {}", n),
            Instruction::LoadIndex(n) => write!(f, "LOAD_INDEX {}", n),
            Instruction::StoreIndex(n) => write!(f, "STORE_INDEX {}", n),
            Instruction::Print => write!(f, "PRINT"),
            Instruction::Input => write!(f, "INPUT"),
            Instruction::BinaryOp(op) => write!(f, "BINARY_OP {}", op),
            Instruction::Jump(t) => write!(f, "JUMP {}", t),
            Instruction::JumpIfFalse(t) => write!(f, "JUMP_IF_FALSE {}", t),
            Instruction::MakeFunc(n) => write!(f, "MAKE_FUNC {}", n),
            Instruction::CallFunc { name, argc } => write!(f, "CALL_FUNC {}/{}", name, argc),
            Instruction::Return => write!(f, "RETURN"),
        }
    }
}
