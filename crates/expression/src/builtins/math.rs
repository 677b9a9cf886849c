//! Mathematical functions

use serde_json::Value;

use super::arg;
use crate::context::EvaluationContext;
use crate::value_utils::{is_numeric_like, number_value, to_number};

/// Numeric arguments of a variadic call; arrays are flattened one level and
/// anything that is not a number or numeric string is skipped.
fn numeric_args(args: &[Value]) -> Vec<f64> {
    args.iter()
        .flat_map(|value| match value {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .filter(|value| is_numeric_like(value))
        .map(to_number)
        .collect()
}

/// Sum of numeric arguments, 0 when there are none
pub fn sum(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(numeric_args(args).iter().sum())
}

/// Mean of numeric arguments, 0 when there are none
pub fn avg(args: &[Value], _ctx: &EvaluationContext) -> Value {
    let values = numeric_args(args);
    if values.is_empty() {
        return Value::from(0);
    }
    number_value(values.iter().sum::<f64>() / values.len() as f64)
}

/// Smallest numeric argument, 0 when there are none
pub fn min(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(
        numeric_args(args)
            .into_iter()
            .reduce(f64::min)
            .unwrap_or(0.0),
    )
}

/// Largest numeric argument, 0 when there are none
pub fn max(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(
        numeric_args(args)
            .into_iter()
            .reduce(f64::max)
            .unwrap_or(0.0),
    )
}

/// Absolute value
pub fn abs(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(to_number(arg(args, 0)).abs())
}

/// `ROUND(n, digits?)`, halves rounded toward positive infinity
pub fn round(args: &[Value], _ctx: &EvaluationContext) -> Value {
    let n = to_number(arg(args, 0));
    let digits = to_number(arg(args, 1)).trunc().clamp(-15.0, 15.0) as i32;
    let factor = 10f64.powi(digits);
    number_value(round_half_up(n * factor) / factor)
}

/// Round down
pub fn floor(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(to_number(arg(args, 0)).floor())
}

/// Round up
pub fn ceil(args: &[Value], _ctx: &EvaluationContext) -> Value {
    number_value(to_number(arg(args, 0)).ceil())
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
