//! Binary operator semantics
//!
//! `==`/`!=` use loose equality. Ordering and arithmetic coerce both
//! operands to numbers. Division or remainder by zero yields `0`.

use serde_json::Value;

use crate::core::ast::BinaryOperator;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::value_utils::{loose_eq, number_value, to_number};

pub(super) fn apply(op: &BinaryOperator, left: &Value, right: &Value) -> ExpressionResult<Value> {
    let result = match op {
        BinaryOperator::Equal => Value::Bool(loose_eq(left, right)),
        BinaryOperator::NotEqual => Value::Bool(!loose_eq(left, right)),
        BinaryOperator::Less => compare(left, right, |a, b| a < b),
        BinaryOperator::LessEqual => compare(left, right, |a, b| a <= b),
        BinaryOperator::Greater => compare(left, right, |a, b| a > b),
        BinaryOperator::GreaterEqual => compare(left, right, |a, b| a >= b),
        BinaryOperator::Add => arithmetic(left, right, |a, b| a + b),
        BinaryOperator::Subtract => arithmetic(left, right, |a, b| a - b),
        BinaryOperator::Multiply => arithmetic(left, right, |a, b| a * b),
        BinaryOperator::Divide => guarded(left, right, |a, b| a / b),
        BinaryOperator::Modulo => guarded(left, right, |a, b| a % b),
        BinaryOperator::Other(op) => {
            return Err(ExpressionError::unsupported_operator("binary", op.as_str()));
        }
    };
    Ok(result)
}

#[inline]
fn compare(left: &Value, right: &Value, cmp: impl FnOnce(f64, f64) -> bool) -> Value {
    Value::Bool(cmp(to_number(left), to_number(right)))
}

#[inline]
fn arithmetic(left: &Value, right: &Value, op: impl FnOnce(f64, f64) -> f64) -> Value {
    number_value(op(to_number(left), to_number(right)))
}

/// Arithmetic whose right operand must be non-zero
#[inline]
fn guarded(left: &Value, right: &Value, op: impl FnOnce(f64, f64) -> f64) -> Value {
    let divisor = to_number(right);
    if divisor == 0.0 {
        return Value::from(0);
    }
    number_value(op(to_number(left), divisor))
}
