//! KoalaCode VM: executes compiled KoalaCode programs.
//!
//! ```
//! use koala_bytecode::{Constant, FunctionTable, Instruction, Program};
//! use koala_vm::Vm;
//!
//! let program = Program::new(
//!     vec![Instruction::PushConst(Constant::Str("hello".into())), Instruction::Print],
//!     FunctionTable::new(),
//! );
//! let mut out = Vec::new();
//! Vm::with_io(std::io::empty(), &mut out).run(&program).unwrap();
//! assert_eq!(out, b"hello\n");
//! ```

pub mod ops;
pub mod value;
pub mod vm;

pub use value::Value;
pub use vm::Vm;
