//! KoalaCode compiler: syntax tree -> bytecode.

mod builder;
pub mod compiler;

pub use compiler::Compiler;
