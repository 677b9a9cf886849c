//! String manipulation functions

use serde_json::Value;

use super::arg;
use crate::context::EvaluationContext;
use crate::value_utils::{to_number, to_text};

/// Join the text form of every argument; null contributes nothing
pub fn concat(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::String(args.iter().map(to_text).collect())
}

/// Convert to uppercase
pub fn upper(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::String(to_text(arg(args, 0)).to_uppercase())
}

/// Convert to lowercase
pub fn lower(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::String(to_text(arg(args, 0)).to_lowercase())
}

/// Trim whitespace from both ends
pub fn trim(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::String(to_text(arg(args, 0)).trim().to_string())
}

/// Character count of the text form, element count of an array
pub fn length(args: &[Value], _ctx: &EvaluationContext) -> Value {
    let len = match arg(args, 0) {
        Value::Array(items) => items.len(),
        other => to_text(other).chars().count(),
    };
    Value::from(len)
}

/// `SUBSTRING(text, start, length?)`, counted in characters
///
/// A negative start is clamped to 0; a missing or null length takes the
/// rest of the string.
pub fn substring(args: &[Value], _ctx: &EvaluationContext) -> Value {
    let text = to_text(arg(args, 0));
    let start = to_index(to_number(arg(args, 1)));
    let chars = text.chars().skip(start);
    let result: String = match arg(args, 2) {
        Value::Null => chars.collect(),
        len => chars.take(to_index(to_number(len))).collect(),
    };
    Value::String(result)
}

/// Replace the first occurrence of `search` with `replacement`
pub fn replace(args: &[Value], _ctx: &EvaluationContext) -> Value {
    let text = to_text(arg(args, 0));
    let search = to_text(arg(args, 1));
    let replacement = to_text(arg(args, 2));
    Value::String(text.replacen(&search, &replacement, 1))
}

fn to_index(n: f64) -> usize {
    if n.is_finite() && n > 0.0 {
        n.trunc() as usize
    } else {
        0
    }
}
