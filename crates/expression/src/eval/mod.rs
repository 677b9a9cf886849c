//! Expression tree evaluation

mod operators;

use std::sync::Arc;

use serde_json::Value;

use crate::builtins::FunctionRegistry;
use crate::config::EvaluatorConfig;
use crate::context::EvaluationContext;
use crate::core::ast::{ExpressionNode, LogicalOperator};
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::value_utils::is_truthy;

/// Evaluator for expression trees
///
/// Stateless apart from its function registry; one instance can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    functions: Arc<FunctionRegistry>,
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Evaluator over the full built-in catalogue
    pub fn new() -> Self {
        Self::with_registry(Arc::new(FunctionRegistry::new()))
    }

    /// Evaluator over a custom registry
    pub fn with_registry(functions: Arc<FunctionRegistry>) -> Self {
        Self {
            functions,
            config: EvaluatorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a tree against a context
    ///
    /// Fails only on structural problems: unknown node type or operator,
    /// wrong operand count, unknown function, or excessive nesting.
    #[inline]
    pub fn evaluate(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext,
    ) -> ExpressionResult<Value> {
        self.eval_with_depth(node, context, 0)
    }

    fn eval_with_depth(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> ExpressionResult<Value> {
        if depth > self.config.max_depth {
            return Err(ExpressionError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }

        match node {
            ExpressionNode::Literal { value } => Ok(value.clone()),

            ExpressionNode::Identifier { name } => {
                Ok(context.field(name).cloned().unwrap_or(Value::Null))
            }

            ExpressionNode::SystemIdentifier { name, property } => {
                let base = context.system(name).cloned().unwrap_or(Value::Null);
                Ok(match property {
                    Some(property) => property_of(&base, &property.name),
                    None => base,
                })
            }

            ExpressionNode::BinaryExpression {
                operator,
                arguments,
            } => {
                let [left, right] = arguments.as_slice() else {
                    return Err(ExpressionError::missing_operands(
                        node.kind_name(),
                        "exactly 2",
                        arguments.len(),
                    ));
                };
                let left = self.eval_with_depth(left, context, depth + 1)?;
                let right = self.eval_with_depth(right, context, depth + 1)?;
                operators::apply(operator, &left, &right)
            }

            ExpressionNode::LogicalExpression {
                operator,
                arguments,
            } => self.eval_logical(node, operator, arguments, context, depth),

            ExpressionNode::CallExpression { callee, arguments } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval_with_depth(argument, context, depth + 1)?);
                }
                self.functions.call(callee, &args, context)
            }

            ExpressionNode::MemberExpression {
                arguments,
                property,
            } => {
                let base = self.single_operand(node, arguments, context, depth)?;
                Ok(member_of(base, &property.name))
            }

            ExpressionNode::AssignmentExpression { arguments } => {
                self.single_operand(node, arguments, context, depth)
            }

            ExpressionNode::Unsupported => Err(ExpressionError::UnsupportedNode),
        }
    }

    /// Every operand is evaluated, so a structural error anywhere surfaces
    /// even when an earlier operand already decides the result.
    fn eval_logical(
        &self,
        node: &ExpressionNode,
        operator: &LogicalOperator,
        operands: &[ExpressionNode],
        context: &EvaluationContext,
        depth: usize,
    ) -> ExpressionResult<Value> {
        match operator {
            LogicalOperator::And | LogicalOperator::Or => {
                if operands.is_empty() {
                    return Err(ExpressionError::missing_operands(
                        node.kind_name(),
                        "at least 1",
                        0,
                    ));
                }
                let mut truthy = Vec::with_capacity(operands.len());
                for operand in operands {
                    let value = self.eval_with_depth(operand, context, depth + 1)?;
                    truthy.push(is_truthy(&value));
                }
                let result = if matches!(operator, LogicalOperator::And) {
                    truthy.iter().all(|t| *t)
                } else {
                    truthy.iter().any(|t| *t)
                };
                Ok(Value::Bool(result))
            }
            LogicalOperator::Not => {
                let value = self.single_operand(node, operands, context, depth)?;
                Ok(Value::Bool(!is_truthy(&value)))
            }
            LogicalOperator::Other(op) => {
                Err(ExpressionError::unsupported_operator("logical", op.as_str()))
            }
        }
    }

    fn single_operand(
        &self,
        node: &ExpressionNode,
        operands: &[ExpressionNode],
        context: &EvaluationContext,
        depth: usize,
    ) -> ExpressionResult<Value> {
        let [operand] = operands else {
            return Err(ExpressionError::missing_operands(
                node.kind_name(),
                "exactly 1",
                operands.len(),
            ));
        };
        self.eval_with_depth(operand, context, depth + 1)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// One level of property access on a system value; null unless `base` is
/// an object carrying `name`.
fn property_of(base: &Value, name: &str) -> Value {
    match base {
        Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Member access: object property, array index, otherwise the base itself
fn member_of(base: Value, name: &str) -> Value {
    match base {
        Value::Object(mut map) => map.remove(name).unwrap_or(Value::Null),
        Value::Array(mut items) => match name.parse::<usize>() {
            Ok(index) if index < items.len() => items.swap_remove(index),
            _ => Value::Null,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::BinaryOperator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type N = ExpressionNode;

    fn eval(node: &N) -> ExpressionResult<Value> {
        let ctx = EvaluationContext::builder()
            .field("Price", json!(50))
            .field("Tags", json!(["a", "b"]))
            .field("Vendor", json!({"_id": "v1", "Name": "Acme"}))
            .current_user(json!({"_id": "u1", "Name": "Ada"}))
            .build();
        Evaluator::new().evaluate(node, &ctx)
    }

    fn member(base: &str, property: &str) -> Value {
        eval(&N::member(N::identifier(base), property)).unwrap()
    }

    fn error_code(node: &N) -> &'static str {
        eval(node).unwrap_err().code()
    }

    #[test]
    fn literal_is_returned_unchanged() {
        for value in [json!(null), json!(1.5), json!("x"), json!([1, {"a": 2}])] {
            assert_eq!(eval(&N::literal(value.clone())).unwrap(), value);
        }
    }

    #[test]
    fn missing_identifier_is_null() {
        assert_eq!(eval(&N::identifier("MRP")).unwrap(), Value::Null);
        assert_eq!(eval(&N::identifier("Price")).unwrap(), json!(50));
    }

    #[test]
    fn system_identifier_with_property() {
        assert_eq!(
            eval(&N::system_property("CURRENT_USER", "Name")).unwrap(),
            json!("Ada")
        );
        assert_eq!(
            eval(&N::system_property("NOW", "Name")).unwrap(),
            Value::Null
        );
        assert_eq!(eval(&N::system("UNKNOWN")).unwrap(), Value::Null);
    }

    #[test]
    fn member_access() {
        assert_eq!(member("Vendor", "Name"), json!("Acme"));
        assert_eq!(member("Vendor", "Nope"), Value::Null);
        assert_eq!(member("Tags", "1"), json!("b"));
        assert_eq!(member("Price", "x"), json!(50));
    }

    #[test]
    fn logical_evaluates_all_operands() {
        let and = N::logical(
            LogicalOperator::And,
            vec![N::literal(false), N::call("NOPE", vec![])],
        );
        assert!(matches!(eval(&and), Err(ExpressionError::FunctionNotFound { .. })));

        let or = N::logical(LogicalOperator::Or, vec![N::literal(0), N::literal("x")]);
        assert_eq!(eval(&or).unwrap(), json!(true));
        assert_eq!(eval(&N::not(N::literal(""))).unwrap(), json!(true));
    }

    #[test]
    fn structural_errors() {
        let lone = N::BinaryExpression {
            operator: BinaryOperator::Equal,
            arguments: vec![N::literal(1)],
        };
        assert_eq!(error_code(&lone), "EXPR:MISSING_OPERANDS");

        let empty_and = N::logical(LogicalOperator::And, vec![]);
        assert_eq!(error_code(&empty_and), "EXPR:MISSING_OPERANDS");

        let double_not = N::logical(LogicalOperator::Not, vec![N::literal(1), N::literal(2)]);
        assert_eq!(error_code(&double_not), "EXPR:MISSING_OPERANDS");

        let xor = N::logical(LogicalOperator::Other("XOR".into()), vec![N::literal(1)]);
        assert_eq!(error_code(&xor), "EXPR:UNSUPPORTED_OPERATOR");

        assert_eq!(error_code(&N::Unsupported), "EXPR:UNSUPPORTED_NODE");
    }

    #[test]
    fn recursion_limit() {
        let mut node = N::literal(1);
        for _ in 0..10 {
            node = N::assignment(node);
        }
        let evaluator = Evaluator::new().with_config(EvaluatorConfig { max_depth: 5 });
        let ctx = EvaluationContext::new();
        let err = evaluator.evaluate(&node, &ctx).unwrap_err();
        assert!(matches!(err, ExpressionError::RecursionLimit { limit: 5 }));
        assert_eq!(Evaluator::new().evaluate(&node, &ctx).unwrap(), json!(1));
    }
}
