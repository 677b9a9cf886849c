//! Built-in function registry
//!
//! Every builtin is total: it accepts any arguments, treats missing or null
//! ones as neutral, and always produces a value. The only error a call can
//! raise is [`ExpressionError::FunctionNotFound`].

mod conditional;
mod datetime;
mod math;
mod string;
mod system;

use std::collections::HashMap;

use serde_json::Value;

use crate::context::EvaluationContext;
use crate::core::error::{ExpressionError, ExpressionResult};

/// Type alias for builtin function implementations
pub type BuiltinFunction = fn(&[Value], &EvaluationContext) -> Value;

static NULL: Value = Value::Null;

/// Argument `index`, or null when the call supplied fewer
#[inline]
pub(crate) fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&NULL)
}

/// Registry of built-in functions, keyed by upper-case name
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, BuiltinFunction>,
}

impl FunctionRegistry {
    /// Registry with the full built-in catalogue
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_string_functions();
        registry.register_math_functions();
        registry.register_datetime_functions();
        registry.register_conditional_functions();
        registry.register_system_functions();
        registry
    }

    /// Registry with no functions at all
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register or replace a function; names are case-insensitive
    pub fn register(&mut self, name: &str, func: BuiltinFunction) {
        self.functions.insert(name.to_ascii_uppercase(), func);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFunction> {
        self.functions
            .get(name)
            .or_else(|| self.functions.get(&name.to_ascii_uppercase()))
            .copied()
    }

    /// Call a function by name
    pub fn call(
        &self,
        name: &str,
        args: &[Value],
        ctx: &EvaluationContext,
    ) -> ExpressionResult<Value> {
        let func = self
            .get(name)
            .ok_or_else(|| ExpressionError::function_not_found(name))?;
        tracing::trace!(function = name, args = args.len(), "calling builtin");
        Ok(func(args, ctx))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_string_functions(&mut self) {
        self.register("CONCAT", string::concat);
        self.register("UPPER", string::upper);
        self.register("LOWER", string::lower);
        self.register("TRIM", string::trim);
        self.register("LENGTH", string::length);
        self.register("SUBSTRING", string::substring);
        self.register("REPLACE", string::replace);
    }

    fn register_math_functions(&mut self) {
        self.register("SUM", math::sum);
        self.register("AVG", math::avg);
        self.register("MIN", math::min);
        self.register("MAX", math::max);
        self.register("ABS", math::abs);
        self.register("ROUND", math::round);
        self.register("FLOOR", math::floor);
        self.register("CEIL", math::ceil);
    }

    fn register_datetime_functions(&mut self) {
        self.register("YEAR", datetime::year);
        self.register("MONTH", datetime::month);
        self.register("DAY", datetime::day);
        self.register("DATE_DIFF", datetime::date_diff);
        self.register("ADD_DAYS", datetime::add_days);
        self.register("ADD_MONTHS", datetime::add_months);
    }

    fn register_conditional_functions(&mut self) {
        self.register("IF", conditional::if_);
    }

    fn register_system_functions(&mut self) {
        self.register("UUID", system::uuid);
        self.register("NOW", system::now);
        self.register("TODAY", system::today);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.function_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::value_utils::{number_value, to_number};

    #[test]
    fn full_catalogue_is_registered() {
        let registry = FunctionRegistry::new();
        for name in [
            "CONCAT",
            "UPPER",
            "LOWER",
            "TRIM",
            "LENGTH",
            "SUBSTRING",
            "REPLACE",
            "SUM",
            "AVG",
            "MIN",
            "MAX",
            "ABS",
            "ROUND",
            "FLOOR",
            "CEIL",
            "YEAR",
            "MONTH",
            "DAY",
            "DATE_DIFF",
            "ADD_DAYS",
            "ADD_MONTHS",
            "IF",
            "UUID",
        ] {
            assert!(registry.has_function(name), "{name} missing");
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = FunctionRegistry::new();
        let ctx = EvaluationContext::new();
        let result = registry.call("upper", &[json!("abc")], &ctx).unwrap();
        assert_eq!(result, json!("ABC"));
    }

    #[test]
    fn unknown_function_is_an_error() {
        let registry = FunctionRegistry::new();
        let err = registry
            .call("FROBNICATE", &[], &EvaluationContext::new())
            .unwrap_err();
        assert_eq!(err.code(), "EXPR:FUNCTION_NOT_FOUND");
        assert!(err.to_string().contains("FROBNICATE"), "{err}");
    }

    #[test]
    fn hosts_can_extend_the_catalogue() {
        fn double(args: &[Value], _ctx: &EvaluationContext) -> Value {
            number_value(to_number(arg(args, 0)) * 2.0)
        }

        let mut registry = FunctionRegistry::empty();
        assert!(registry.is_empty());
        registry.register("Double", double);
        assert_eq!(registry.function_names(), vec!["DOUBLE"]);

        let ctx = EvaluationContext::new();
        assert_eq!(
            registry.call("DOUBLE", &[json!(21)], &ctx).unwrap(),
            json!(42)
        );
    }
}
