//! Bytecode IR for KoalaCode.
//!
//! A [`Program`] is what the compiler hands the VM: the top-level instruction
//! sequence plus a table of compiled functions. Each instruction sequence has
//! its own index space starting at 0, so jump targets never cross functions.

pub mod instruction;
pub mod program;

pub use instruction::{Constant, Instruction};
pub use program::{Function, FunctionTable, Program};

/// Name of the intrinsic the VM answers without a call frame.
pub const LEN_INTRINSIC: &str = "len";

