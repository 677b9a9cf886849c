//! Conditional functions

use serde_json::Value;

use super::arg;
use crate::context::EvaluationContext;
use crate::value_utils::is_truthy;

/// `IF(condition, when_true, when_false)`
pub fn if_(args: &[Value], _ctx: &EvaluationContext) -> Value {
    if is_truthy(arg(args, 0)) {
        arg(args, 1).clone()
    } else {
        arg(args, 2).clone()
    }
}
