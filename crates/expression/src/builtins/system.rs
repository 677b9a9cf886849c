//! Runtime-supplied values

use serde_json::Value;

use crate::context::{EvaluationContext, system};

/// Fresh random v4 UUID
pub fn uuid(_args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::String(uuid::Uuid::new_v4().to_string())
}

/// Same value as the `NOW` system identifier
pub fn now(_args: &[Value], ctx: &EvaluationContext) -> Value {
    ctx.system(system::NOW).cloned().unwrap_or(Value::Null)
}

/// Same value as the `TODAY` system identifier
pub fn today(_args: &[Value], ctx: &EvaluationContext) -> Value {
    ctx.system(system::TODAY).cloned().unwrap_or(Value::Null)
}
