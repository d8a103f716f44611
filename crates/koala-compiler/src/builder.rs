//! Per-function code emission and jump backpatching.

use koala_bytecode::{Constant, Instruction as BC};
use koala_syntax::ast::*;
use koala_syntax::error::{error, error_at, ErrorKind, Result};

use crate::compiler::Compiler;

/// Emits one instruction sequence. Every builder owns a fresh index space, so
/// jump targets it produces are only meaningful inside its own code.
pub(crate) struct FuncBuilder {
    code: Vec<BC>,
    in_function: bool,
}

impl FuncBuilder {
    pub(crate) fn new(in_function: bool) -> Self {
        Self { code: Vec::new(), in_function }
    }

    pub(crate) fn finish(self) -> Vec<BC> {
        self.code
    }

    pub(crate) fn emit(&mut self, i: BC) -> usize {
        self.code.push(i);
        self.code.len() - 1
    }

    fn here(&self) -> usize {
        self.code.len()
    }

    /// Points the placeholder jump at `at` to the next instruction to be emitted.
    fn patch_to_here(&mut self, at: usize) -> Result<()> {
        let tgt = self.here();
        match self.code.get_mut(at) {
            Some(BC::Jump(x)) | Some(BC::JumpIfFalse(x)) => {
                *x = tgt;
                Ok(())
            }
            other => error(ErrorKind::Compile, format!("cannot patch at {}: {:?}", at, other)),
        }
    }

    pub(crate) fn emit_stmt(&mut self, c: &mut Compiler, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Block { stmts, .. } => {
                for s in stmts {
                    self.emit_stmt(c, s)?;
                }
                Ok(())
            }
            Stmt::Give { expr, .. } => {
                self.emit_expr(expr);
                self.emit(BC::Print);
                Ok(())
            }
            Stmt::Assign { name, expr, .. } => {
                self.emit_expr(expr);
                self.emit(BC::StoreVar(name.clone()));
                Ok(())
            }
            Stmt::AssignIndex { name, index, value, .. } => {
                self.emit_expr(index);
                self.emit_expr(value);
                self.emit(BC::StoreIndex(name.clone()));
                Ok(())
            }
            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.emit_expr(cond);
                let jf_at = self.emit(BC::JumpIfFalse(0));
                self.emit_stmt(c, then_branch)?;
                match else_branch {
                    Some(else_branch) => {
                        let jend_at = self.emit(BC::Jump(0));
                        self.patch_to_here(jf_at)?; // else starts here
                        self.emit_stmt(c, else_branch)?;
                        self.patch_to_here(jend_at)?;
                    }
                    None => self.patch_to_here(jf_at)?,
                }
                Ok(())
            }
            Stmt::While { cond, body, .. } => {
                let loop_start = self.here();
                self.emit_expr(cond);
                let jf_at = self.emit(BC::JumpIfFalse(0));
                self.emit_stmt(c, body)?;
                self.emit(BC::Jump(loop_start));
                self.patch_to_here(jf_at)?;
                Ok(())
            }
            Stmt::For { init, cond, step, body, .. } => {
                self.emit_stmt(c, init)?;
                let loop_start = self.here();
                self.emit_expr(cond);
                let jf_at = self.emit(BC::JumpIfFalse(0));
                self.emit_stmt(c, body)?;
                self.emit_stmt(c, step)?;
                self.emit(BC::Jump(loop_start));
                self.patch_to_here(jf_at)?;
                Ok(())
            }
            Stmt::FuncDef { name, params, body, span } => {
                c.define(name, params, body, *span)?;
                self.emit(BC::MakeFunc(name.clone()));
                Ok(())
            }
            Stmt::Return { value, span } => {
                if !self.in_function {
                    return error_at(ErrorKind::Compile, *span, "'return' outside of function");
                }
                self.emit_expr(value);
                self.emit(BC::Return);
                Ok(())
            }
            Stmt::Expr { expr, .. } => {
                self.emit_expr(expr);
                self.emit(BC::Pop);
                Ok(())
            }
        }
    }

    /// Expressions cannot fail to compile: each kind maps to a fixed sequence.
    fn emit_expr(&mut self, e: &Expr) {
        match e {
            Expr::Num { value, .. } => {
                self.emit(BC::PushConst(Constant::Int(*value)));
            }
            Expr::Str { value, .. } => {
                self.emit(BC::PushConst(Constant::Str(value.clone())));
            }
            Expr::Bool { value, .. } => {
                self.emit(BC::PushConst(Constant::Bool(*value)));
            }
            Expr::Var { name, .. } => {
                self.emit(BC::LoadVar(name.clone()));
            }
            Expr::Array { elems, .. } => {
                for a in elems {
                    self.emit_expr(a);
                }
                self.emit(BC::BuildArray(elems.len()));
            }
            Expr::Index { name, index, .. } => {
                self.emit_expr(index);
                self.emit(BC::LoadIndex(name.clone()));
            }
            Expr::Take { .. } => {
                self.emit(BC::Input);
            }
            Expr::Binary { op, left, right, .. } => {
                self.emit_expr(left);
                self.emit_expr(right);
                self.emit(BC::BinaryOp(*op));
            }
            Expr::Call { name, args, .. } => {
                for a in args {
                    self.emit_expr(a);
                }
                self.emit(BC::CallFunc { name: name.clone(), argc: args.len() });
            }
        }
    }
}
