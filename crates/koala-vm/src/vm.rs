//! KoalaCode VM core.

use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};
use std::mem;

use koala_bytecode::{Function, Instruction, Program, LEN_INTRINSIC};
use koala_syntax::error::{runtime, Fault, Result};
use log::trace;

use crate::ops::binary_op;
use crate::value::Value;

/// One activation: the code being run, where we are in it, and its variables.
struct Frame<'p> {
    function: &'p Function,
    ip: usize,
    vars: HashMap<String, Value>,
}

/// A stack machine executing one [`Program`] per [`Vm::run`] call.
///
/// Top-level variables outlive a run so a REPL can build on earlier inputs.
pub struct Vm<'io> {
    stack: Vec<Value>,
    globals: HashMap<String, Value>,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
}

impl Default for Vm<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm<'static> {
    /// A VM reading process stdin and writing process stdout.
    pub fn new() -> Self {
        Self::with_io(StdinLines::default(), io::stdout())
    }
}

/// Process stdin, pulled one line at a time and locked only while reading.
///
/// Holding a `StdinLock` for the VM's lifetime would block a host that reads
/// stdin itself between runs, as the REPL does.
#[derive(Default)]
struct StdinLines {
    line: Vec<u8>,
    pos: usize,
}

impl Read for StdinLines {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = {
            let avail = self.fill_buf()?;
            let n = avail.len().min(out.len());
            out[..n].copy_from_slice(&avail[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            io::stdin().lock().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

impl<'io> Vm<'io> {
    pub fn with_io(input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        Self { stack: Vec::new(), globals: HashMap::new(), input: Box::new(input), output: Box::new(output) }
    }

    pub fn globals_snapshot(&self) -> Vec<(String, Value)> {
        let mut v: Vec<(String, Value)> = self.globals.iter().map(|(k, val)| (k.clone(), val.clone())).collect();
        v.sort_by(|a, b| a.0.cmp(&b.0));
        v
    }

    /// Values left on the operand stack after the last run.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Drops all top-level variables.
    pub fn reset(&mut self) {
        self.globals.clear();
        self.stack.clear();
    }

    /// Executes `program` to completion or to its first runtime failure.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let mut frame = Frame { function: &program.main, ip: 0, vars: mem::take(&mut self.globals) };
        let mut call_stack: Vec<Frame> = Vec::new();

        let result = self.execute(program, &mut frame, &mut call_stack);

        // the bottom frame holds the top-level bindings
        let top = if call_stack.is_empty() { frame } else { call_stack.swap_remove(0) };
        self.globals = top.vars;
        if result.is_err() {
            self.stack.clear();
        }
        result
    }

    fn pop(&mut self, op: &str) -> Result<Value> {
        match self.stack.pop() {
            Some(v) => Ok(v),
            None => runtime(Fault::Internal, format!("stack underflow in {}", op)),
        }
    }

    fn pop_n(&mut self, n: usize, op: &str) -> Result<Vec<Value>> {
        if self.stack.len() < n {
            return runtime(Fault::Internal, format!("stack underflow in {}", op));
        }
        let start = self.stack.len() - n;
        Ok(self.stack.drain(start..).collect())
    }

    fn execute<'p>(
        &mut self,
        program: &'p Program,
        frame: &mut Frame<'p>,
        call_stack: &mut Vec<Frame<'p>>,
    ) -> Result<()> {
        loop {
            let function: &'p Function = frame.function;
            let Some(instr) = function.code.get(frame.ip) else {
                match call_stack.pop() {
                    None => return Ok(()),
                    Some(caller) => {
                        // fell off the end of a callee: behaves as `return nil`
                        *frame = caller;
                        self.stack.push(Value::Nil);
                        continue;
                    }
                }
            };
            trace!("{}@{}: {}", function.name, frame.ip, instr);
            frame.ip += 1;

            match instr {
                Instruction::PushConst(c) => self.stack.push(Value::from(c)),
                Instruction::Pop => {
                    self.pop("POP")?;
                }
                Instruction::LoadVar(name) => match frame.vars.get(name) {
                    Some(v) => self.stack.push(v.clone()),
                    None => return runtime(Fault::Undefined, format!("Undefined variable '{}'", name)),
                },
                Instruction::StoreVar(name) => {
                    let v = self.pop("STORE_VAR")?;
                    frame.vars.insert(name.clone(), v);
                }
                Instruction::BuildArray(n) => {
                    let items = self.pop_n(*n, "BUILD_ARRAY")?;
                    self.stack.push(Value::array(items));
                }
                Instruction::LoadIndex(name) => {
                    let idx = self.pop("LOAD_INDEX")?;
                    let v = load_index(&frame.vars, name, idx)?;
                    self.stack.push(v);
                }
                Instruction::StoreIndex(name) => {
                    let v = self.pop("STORE_INDEX")?;
                    let idx = self.pop("STORE_INDEX")?;
                    store_index(&frame.vars, name, idx, v)?;
                }
                Instruction::Print => {
                    let v = self.pop("PRINT")?;
                    writeln!(self.output, "{}", v)?;
                    self.output.flush()?;
                }
                Instruction::Input => {
                    let line = self.read_line()?;
                    self.stack.push(Value::Str(line));
                }
                Instruction::BinaryOp(op) => {
                    let right = self.pop("BINARY_OP")?;
                    let left = self.pop("BINARY_OP")?;
                    self.stack.push(binary_op(*op, left, right)?);
                }
                Instruction::Jump(target) => frame.ip = check_target(function, *target)?,
                Instruction::JumpIfFalse(target) => match self.pop("JUMP_IF_FALSE")? {
                    Value::Bool(false) => frame.ip = check_target(function, *target)?,
                    Value::Bool(true) => {}
                    other => {
                        return runtime(
                            Fault::InvalidOperands,
                            format!("condition must be a boolean, got {}", other.kind_name()),
                        )
                    }
                },
                // registration already happened at compile time
                Instruction::MakeFunc(_) => {}
                Instruction::CallFunc { name, argc } => {
                    let args = self.pop_n(*argc, "CALL_FUNC")?;
                    if name == LEN_INTRINSIC {
                        let n = len_of(args)?;
                        self.stack.push(Value::Int(n));
                        continue;
                    }
                    let Some(callee) = program.functions.get(name) else {
                        return runtime(Fault::Undefined, format!("Undefined function '{}'", name));
                    };
                    if callee.arity() != *argc {
                        return runtime(
                            Fault::Arity,
                            format!("Function '{}' expects {} argument(s), got {}", name, callee.arity(), argc),
                        );
                    }
                    let vars = callee.params.iter().cloned().zip(args).collect();
                    let callee_frame = Frame { function: callee, ip: 0, vars };
                    call_stack.push(mem::replace(frame, callee_frame));
                }
                Instruction::Return => {
                    let v = self.pop("RETURN")?;
                    match call_stack.pop() {
                        Some(caller) => *frame = caller,
                        None => return runtime(Fault::Internal, "RETURN with an empty call stack"),
                    }
                    self.stack.push(v);
                }
            }
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return runtime(Fault::Io, "IO error: unexpected end of input");
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

fn check_target(function: &Function, target: usize) -> Result<usize> {
    if target > function.code.len() {
        return runtime(
            Fault::Internal,
            format!("jump target {} outside of '{}' ({} instructions)", target, function.name, function.code.len()),
        );
    }
    Ok(target)
}

fn as_index(idx: Value, len: usize) -> Result<usize> {
    match idx {
        Value::Int(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
        Value::Int(i) => runtime(Fault::OutOfBounds, format!("Index {} out of bounds for length {}", i, len)),
        other => runtime(Fault::InvalidOperands, format!("index must be an integer, got {}", other.kind_name())),
    }
}

fn load_index(vars: &HashMap<String, Value>, name: &str, idx: Value) -> Result<Value> {
    match vars.get(name) {
        None => runtime(Fault::Undefined, format!("Undefined array '{}'", name)),
        Some(Value::Array(items)) => {
            let items = items.borrow();
            let i = as_index(idx, items.len())?;
            Ok(items[i].clone())
        }
        Some(Value::Str(s)) => {
            let chars: Vec<char> = s.chars().collect();
            let i = as_index(idx, chars.len())?;
            Ok(Value::Str(chars[i].to_string()))
        }
        Some(other) => runtime(Fault::InvalidOperands, format!("'{}' is {}, not an array", name, other.kind_name())),
    }
}

fn store_index(vars: &HashMap<String, Value>, name: &str, idx: Value, v: Value) -> Result<()> {
    match vars.get(name) {
        None => runtime(Fault::Undefined, format!("Undefined array '{}'", name)),
        Some(Value::Array(items)) => {
            let mut items = items.borrow_mut();
            let i = as_index(idx, items.len())?;
            items[i] = v;
            Ok(())
        }
        Some(other) => runtime(Fault::InvalidOperands, format!("'{}' is {}, not an array", name, other.kind_name())),
    }
}

fn len_of(args: Vec<Value>) -> Result<i64> {
    if args.len() != 1 {
        return runtime(Fault::Arity, format!("'{}' expects 1 argument, got {}", LEN_INTRINSIC, args.len()));
    }
    let n = match &args[0] {
        Value::Array(items) => items.borrow().len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return runtime(
                Fault::InvalidOperands,
                format!("'{}' expects an array or text, got {}", LEN_INTRINSIC, other.kind_name()),
            )
        }
    };
    Ok(n as i64)
}
