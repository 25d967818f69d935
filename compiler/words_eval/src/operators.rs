//! Operator implementations for the evaluator.
//!
//! Direct enum-based dispatch: the operator and value sets are fixed, so
//! pattern matching is preferred over trait objects.
//!
//! Arithmetic coerces both operands to numbers. `+` falls back to string
//! concatenation when either operand is a string that will not coerce.
//! Logical operators take predicate results only; both operands are always
//! evaluated.

use words_ir::BinaryOp;

use crate::errors::{invalid_type, invariant, EvalError, EvalResult};
use crate::value::{compare_values, values_equal, Value, ValueKind};

/// Evaluate a binary operation on already evaluated operands.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Exponentiate => {
            let (a, b) = numeric_operands(left, right)?;
            Ok(Value::Num(apply_arithmetic(a, b, op)))
        }
        BinaryOp::Equals => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
            compare_values(&left, &right, op).map(Value::Bool)
        }
        BinaryOp::And => Ok(Value::Bool(
            left.into_bool("and")? & right.into_bool("and")?,
        )),
        BinaryOp::Or => Ok(Value::Bool(left.into_bool("or")? | right.into_bool("or")?)),
    }
}

fn eval_add(left: Value, right: Value) -> EvalResult {
    match (left.coerce_to_number(), right.coerce_to_number()) {
        (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
        (l @ (Value::Str(_) | Value::Num(_)), r @ (Value::Str(_) | Value::Num(_))) => {
            let mut text = l.into_string()?;
            text.push_str(&r.into_string()?);
            Ok(Value::Str(text))
        }
        (l, r) => {
            let offending = if matches!(l, Value::Str(_) | Value::Num(_)) { r } else { l };
            Err(invalid_type(ValueKind::Num, offending.kind()))
        }
    }
}

fn numeric_operands(left: Value, right: Value) -> Result<(f64, f64), EvalError> {
    Ok((left.into_number()?, right.into_number()?))
}

fn apply_arithmetic(a: f64, b: f64, op: BinaryOp) -> f64 {
    match op {
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => a / b,
        BinaryOp::Exponentiate => a.powf(b),
        _ => a + b,
    }
}

/// Numeric negation.
pub fn evaluate_negate(value: Value) -> EvalResult {
    Ok(Value::Num(-value.into_number()?))
}

/// Logical not; the operand must be a predicate result.
pub fn evaluate_not(value: Value) -> EvalResult {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(invariant(format!(
            "not expected a predicate, got {}",
            other.kind()
        ))),
    }
}
