//! Runtime values for the KoalaCode VM.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use koala_bytecode::Constant;

type ArrayPtr = *const RefCell<Vec<Value>>;

/// A value on the operand stack or in a variable.
///
/// Arrays are shared: cloning a `Value::Array` clones the handle, not the
/// elements, so assignment and argument passing alias the same storage.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Array(Rc<RefCell<Vec<Value>>>),
    Nil,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Name of this value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "text",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
            Value::Nil => "nil",
        }
    }

    /// Structural equality. Arrays compare element by element; a pair of
    /// arrays already under comparison counts as equal, so self-containing
    /// arrays terminate.
    pub fn structural_eq(&self, other: &Value) -> bool {
        self.eq_nested(other, &mut Vec::new())
    }

    fn eq_nested(&self, other: &Value, seen: &mut Vec<(ArrayPtr, ArrayPtr)>) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
                if seen.contains(&pair) {
                    return true;
                }
                let (xs, ys) = (a.borrow(), b.borrow());
                if xs.len() != ys.len() {
                    return false;
                }
                // pairs stay recorded: any mismatch below fails the whole comparison
                seen.push(pair);
                xs.iter().zip(ys.iter()).all(|(x, y)| x.eq_nested(y, seen))
            }
            _ => false,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<ArrayPtr>) -> fmt::Result {
        match self {
            Value::Str(s) if !open.is_empty() => write!(f, "{:?}", s),
            Value::Array(items) => {
                let ptr = Rc::as_ptr(items);
                if open.contains(&ptr) {
                    return write!(f, "[...]");
                }
                open.push(ptr);
                write!(f, "[")?;
                for (i, it) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    it.fmt_nested(f, open)?;
                }
                open.pop();
                write!(f, "]")
            }
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl From<&Constant> for Value {
    fn from(c: &Constant) -> Self {
        match c {
            Constant::Int(n) => Value::Int(*n),
            Constant::Str(s) => Value::Str(s.clone()),
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Nil => Value::Nil,
        }
    }
}

/// Top-level strings print raw; strings inside arrays print quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Array(_) => self.fmt_nested(f, &mut Vec::new()),
        }
    }
}
