//! Operator semantics. Every kind check for `BINARY_OP` happens here.

use koala_syntax::ast::BinOp;
use koala_syntax::error::{runtime, Fault, Result};

use crate::value::Value;

/// Integer division rounding toward negative infinity.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn overflow(op: BinOp, a: i64, b: i64) -> Result<Value> {
    runtime(Fault::Arithmetic, format!("integer overflow in {} {} {}", a, op, b))
}

fn mismatch(op: BinOp, left: &Value, right: &Value) -> Result<Value> {
    runtime(
        Fault::InvalidOperands,
        format!("cannot apply '{}' to {} and {}", op, left.kind_name(), right.kind_name()),
    )
}

/// Applies `op` to already-evaluated operands.
pub fn binary_op(op: BinOp, left: Value, right: Value) -> Result<Value> {
    use BinOp::*;
    match op {
        Eq => return Ok(Value::Bool(left.structural_eq(&right))),
        Ne => return Ok(Value::Bool(!left.structural_eq(&right))),
        _ => {}
    }
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            let v = match op {
                Add => a.checked_add(b).map(Value::Int),
                Sub => a.checked_sub(b).map(Value::Int),
                Mul => a.checked_mul(b).map(Value::Int),
                Div => {
                    if b == 0 {
                        return runtime(Fault::Arithmetic, "division by zero");
                    }
                    floor_div(a, b).map(Value::Int)
                }
                Lt => Some(Value::Bool(a < b)),
                Gt => Some(Value::Bool(a > b)),
                Le => Some(Value::Bool(a <= b)),
                Ge => Some(Value::Bool(a >= b)),
                _ => return mismatch(op, &left, &right),
            };
            match v {
                Some(v) => Ok(v),
                None => overflow(op, a, b),
            }
        }
        (Value::Str(a), Value::Str(b)) => match op {
            Add => Ok(Value::Str(format!("{}{}", a, b))),
            Lt => Ok(Value::Bool(a < b)),
            Gt => Ok(Value::Bool(a > b)),
            Le => Ok(Value::Bool(a <= b)),
            Ge => Ok(Value::Bool(a >= b)),
            _ => mismatch(op, &left, &right),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            And => Ok(Value::Bool(*a && *b)),
            Or => Ok(Value::Bool(*a || *b)),
            _ => mismatch(op, &left, &right),
        },
        (Value::Array(a), Value::Array(b)) if op == Add => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::array(items))
        }
        _ => mismatch(op, &left, &right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(binary_op(BinOp::Div, int(-7), int(2)).unwrap(), int(-4));
        assert_eq!(binary_op(BinOp::Div, int(7), int(-2)).unwrap(), int(-4));
        assert_eq!(binary_op(BinOp::Div, int(-7), int(-2)).unwrap(), int(3));
        assert_eq!(binary_op(BinOp::Div, int(6), int(3)).unwrap(), int(2));
        assert_eq!(floor_div(i64::MIN, -1), None);
    }

    #[test]
    fn test_division_by_zero() {
        let err = binary_op(BinOp::Div, int(1), int(0)).unwrap_err();
        assert_eq!(err.fault(), Some(Fault::Arithmetic));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = binary_op(BinOp::Add, int(i64::MAX), int(1)).unwrap_err();
        assert_eq!(err.fault(), Some(Fault::Arithmetic));
        assert!(err.msg.contains("overflow"));
    }

    #[test]
    fn test_text_and_array_concatenation() {
        let s = binary_op(BinOp::Add, Value::Str("ko".into()), Value::Str("ala".into())).unwrap();
        assert_eq!(s, Value::Str("koala".into()));

        let a = Value::array(vec![int(1)]);
        let joined = binary_op(BinOp::Add, a.clone(), Value::array(vec![int(2)])).unwrap();
        assert_eq!(joined, Value::array(vec![int(1), int(2)]));
        // operands are untouched
        assert_eq!(a, Value::array(vec![int(1)]));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary_op(BinOp::Le, int(2), int(2)).unwrap(), Value::Bool(true));
        assert_eq!(binary_op(BinOp::Gt, int(1), int(2)).unwrap(), Value::Bool(false));
        assert_eq!(binary_op(BinOp::Lt, Value::Str("a".into()), Value::Str("b".into())).unwrap(), Value::Bool(true));
        assert_eq!(binary_op(BinOp::Eq, int(1), Value::Str("1".into())).unwrap(), Value::Bool(false));
        assert_eq!(binary_op(BinOp::Ne, Value::Nil, Value::Nil).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_logical_ops_need_booleans() {
        assert_eq!(binary_op(BinOp::And, Value::Bool(true), Value::Bool(false)).unwrap(), Value::Bool(false));
        assert_eq!(binary_op(BinOp::Or, Value::Bool(false), Value::Bool(true)).unwrap(), Value::Bool(true));
        let err = binary_op(BinOp::And, int(1), Value::Bool(true)).unwrap_err();
        assert_eq!(err.fault(), Some(Fault::InvalidOperands));
    }

    #[test]
    fn test_mixed_kinds_are_rejected() {
        let err = binary_op(BinOp::Add, int(1), Value::Str("x".into())).unwrap_err();
        assert_eq!(err.fault(), Some(Fault::InvalidOperands));
        assert_eq!(err.msg, "cannot apply '+' to integer and text");
        assert!(binary_op(BinOp::Sub, Value::Str("a".into()), Value::Str("b".into())).is_err());
        assert!(binary_op(BinOp::Lt, Value::Bool(true), Value::Bool(false)).is_err());
    }
}
